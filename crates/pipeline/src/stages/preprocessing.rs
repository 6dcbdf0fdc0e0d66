//! Preprocessing stage: face alignment.

use std::sync::Arc;

use async_trait::async_trait;
use persona_core::context::PipelineContext;

use crate::capabilities::FaceAligner;
use crate::error::PipelineError;
use crate::stage::{stage_error, PipelineStage};

/// Reads the validated photos and produces one aligned image (plus an
/// optional landmark reference) per input photo in the scratch directory.
pub struct PreprocessingStage {
    aligner: Arc<dyn FaceAligner>,
}

impl PreprocessingStage {
    pub fn new(aligner: Arc<dyn FaceAligner>) -> Self {
        Self { aligner }
    }
}

#[async_trait]
impl PipelineStage for PreprocessingStage {
    fn name(&self) -> &'static str {
        "preprocessing"
    }

    async fn run(&self, context: &mut PipelineContext) -> Result<(), PipelineError> {
        context.aligned_images = self
            .aligner
            .align(&context.photos, &context.temp_dir)
            .await
            .map_err(|err| stage_error(self.name(), format!("Face alignment failed: {err}")))?;
        Ok(())
    }
}
