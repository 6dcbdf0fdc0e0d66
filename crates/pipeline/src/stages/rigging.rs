//! Rigging stage: skeleton/control generation plus blendshape export.

use std::sync::Arc;

use async_trait::async_trait;
use persona_core::context::PipelineContext;

use crate::capabilities::{BlendshapeExporter, RiggingEngine};
use crate::error::PipelineError;
use crate::stage::{stage_error, PipelineStage};

/// Reads the mesh result and texture location and produces the rigging
/// result. Also triggers the blendshape manifest export, a side effect
/// that is not carried forward in the context.
pub struct RiggingStage {
    engine: Arc<dyn RiggingEngine>,
    exporter: Arc<dyn BlendshapeExporter>,
}

impl RiggingStage {
    pub fn new(engine: Arc<dyn RiggingEngine>, exporter: Arc<dyn BlendshapeExporter>) -> Self {
        Self { engine, exporter }
    }
}

#[async_trait]
impl PipelineStage for RiggingStage {
    fn name(&self) -> &'static str {
        "rigging"
    }

    async fn run(&self, context: &mut PipelineContext) -> Result<(), PipelineError> {
        let mesh = context
            .mesh_result
            .as_ref()
            .ok_or_else(|| stage_error(self.name(), "Rigging requires a mesh result"))?;
        let texture_path = context
            .texture_path
            .as_deref()
            .ok_or_else(|| stage_error(self.name(), "Rigging requires a texture location"))?;

        let rigging = self
            .engine
            .rig(mesh, texture_path, &context.temp_dir)
            .await
            .map_err(|err| stage_error(self.name(), format!("Rigging failed: {err}")))?;

        self.exporter
            .export(&rigging, &context.temp_dir)
            .await
            .map_err(|err| {
                stage_error(self.name(), format!("Blendshape export failed: {err}"))
            })?;

        context.rigging_result = Some(rigging);
        Ok(())
    }
}
