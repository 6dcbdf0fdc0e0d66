//! Reconstruction stage: 3D mesh reconstruction followed by texture
//! generation keyed on the resulting mesh.

use std::sync::Arc;

use async_trait::async_trait;
use persona_core::context::PipelineContext;

use crate::capabilities::{MeshReconstructor, TextureGenerator};
use crate::error::PipelineError;
use crate::stage::{stage_error, PipelineStage};

/// Reads the aligned images and produces the mesh result and texture
/// location. The two external capabilities run in sequence: texture
/// generation depends on the reconstructed mesh.
pub struct ReconstructionStage {
    reconstructor: Arc<dyn MeshReconstructor>,
    texture_generator: Arc<dyn TextureGenerator>,
}

impl ReconstructionStage {
    pub fn new(
        reconstructor: Arc<dyn MeshReconstructor>,
        texture_generator: Arc<dyn TextureGenerator>,
    ) -> Self {
        Self {
            reconstructor,
            texture_generator,
        }
    }
}

#[async_trait]
impl PipelineStage for ReconstructionStage {
    fn name(&self) -> &'static str {
        "reconstruction"
    }

    async fn run(&self, context: &mut PipelineContext) -> Result<(), PipelineError> {
        let mesh = self
            .reconstructor
            .reconstruct(&context.aligned_images, &context.temp_dir)
            .await
            .map_err(|err| stage_error(self.name(), format!("Reconstruction failed: {err}")))?;

        let texture_path = self
            .texture_generator
            .generate(&context.aligned_images, &mesh, &context.temp_dir)
            .await
            .map_err(|err| {
                stage_error(self.name(), format!("Texture generation failed: {err}"))
            })?;

        context.mesh_result = Some(mesh);
        context.texture_path = Some(texture_path);
        Ok(())
    }
}
