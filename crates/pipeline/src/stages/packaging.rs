//! Packaging stage: fan out final results to every registered writer.

use std::sync::Arc;

use async_trait::async_trait;
use persona_core::artifacts::AssetEntry;
use persona_core::context::PipelineContext;

use crate::error::PipelineError;
use crate::stage::{stage_error, PipelineStage};
use crate::writers::AssetWriter;

/// Reads mesh, texture, and rigging results and produces the context's
/// asset map by invoking every registered writer.
///
/// Fails before any writer executes when a required upstream field is
/// missing; a failure in one writer aborts the whole stage, so there is
/// never a partial multi-writer success.
pub struct PackagingStage {
    writers: Vec<Arc<dyn AssetWriter>>,
    asset_base_url: String,
}

impl PackagingStage {
    pub fn new(writers: Vec<Arc<dyn AssetWriter>>, asset_base_url: impl Into<String>) -> Self {
        Self {
            writers,
            asset_base_url: asset_base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PipelineStage for PackagingStage {
    fn name(&self) -> &'static str {
        "packaging"
    }

    async fn run(&self, context: &mut PipelineContext) -> Result<(), PipelineError> {
        let (mesh, texture_path, rigging) = match (
            context.mesh_result.as_ref(),
            context.texture_path.as_deref(),
            context.rigging_result.as_ref(),
        ) {
            (Some(mesh), Some(texture), Some(rigging)) => (mesh, texture, rigging),
            _ => {
                return Err(stage_error(
                    self.name(),
                    "Packaging requires mesh, texture, and rigging results",
                ))
            }
        };

        tokio::fs::create_dir_all(&context.output_dir)
            .await
            .map_err(|err| stage_error(self.name(), format!("Packaging failed: {err}")))?;

        for writer in &self.writers {
            let result = writer
                .write(
                    context.job_id,
                    mesh,
                    texture_path,
                    rigging,
                    &context.output_dir,
                )
                .await
                .map_err(|err| stage_error(self.name(), format!("Packaging failed: {err}")))?;

            let file_name = result
                .file_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let uri = format!("{}/{file_name}", self.asset_base_url);

            context.assets.insert(
                result.asset_type.to_string(),
                AssetEntry {
                    uri,
                    file_path: result.file_path,
                    metadata: result.metadata,
                },
            );
        }

        Ok(())
    }
}
