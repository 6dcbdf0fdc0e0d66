//! Ingestion stage: validate the submitted source photos.

use std::sync::Arc;

use async_trait::async_trait;
use persona_core::context::PipelineContext;

use crate::capabilities::PhotoValidator;
use crate::error::PipelineError;
use crate::stage::{stage_error, PipelineStage};

/// Reads the raw photo list and produces the validated photo list.
///
/// Rejects empty input, missing URLs, disallowed formats, and
/// below-threshold resolutions via the injected validator.
pub struct IngestionStage {
    validator: Arc<dyn PhotoValidator>,
}

impl IngestionStage {
    pub fn new(validator: Arc<dyn PhotoValidator>) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl PipelineStage for IngestionStage {
    fn name(&self) -> &'static str {
        "ingestion"
    }

    async fn run(&self, context: &mut PipelineContext) -> Result<(), PipelineError> {
        context.photos = self
            .validator
            .validate(&context.photo_sources)
            .await
            .map_err(|err| stage_error(self.name(), err))?;
        Ok(())
    }
}
