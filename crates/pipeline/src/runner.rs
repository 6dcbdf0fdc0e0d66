//! The stage runner: executes a persisted job end to end.

use std::sync::Arc;

use persona_core::config::Settings;
use persona_core::context::PipelineContext;
use persona_core::photos::PhotoSource;
use persona_db::models::job::{Job, StatusUpdate};
use persona_db::models::status::JobStatus;
use serde_json::json;
use uuid::Uuid;

use crate::capabilities::{
    DecaReconstructor, LandmarkAligner, ManifestBlendshapeExporter, SkeletonRigger,
    StrictPhotoValidator, UvTextureGenerator,
};
use crate::error::PipelineError;
use crate::stage::PipelineStage;
use crate::stages::{
    IngestionStage, PackagingStage, PreprocessingStage, ReconstructionStage, RiggingStage,
};
use crate::store::JobStore;
use crate::writers::{AssetWriter, FbxWriter, GlbWriter};

/// Progress persisted when a run transitions to RUNNING, before the
/// first stage completes. Distinguishes "picked up" from "untouched".
pub const INITIAL_PROGRESS: f64 = 0.01;

/// Drives a job through an ordered list of stages, persisting one
/// status transition per completed stage.
///
/// All stage and capability state is shared behind `Arc`, so a single
/// runner serves every queued job concurrently.
pub struct PipelineRunner {
    store: Arc<dyn JobStore>,
    stages: Vec<Arc<dyn PipelineStage>>,
    settings: Settings,
}

impl PipelineRunner {
    pub fn new(
        store: Arc<dyn JobStore>,
        stages: Vec<Arc<dyn PipelineStage>>,
        settings: Settings,
    ) -> Self {
        Self {
            store,
            stages,
            settings,
        }
    }

    /// The production wiring: the five standard stages with the stock
    /// capabilities and both asset writers.
    pub fn with_default_stages(store: Arc<dyn JobStore>, settings: Settings) -> Self {
        let writers: Vec<Arc<dyn AssetWriter>> = vec![
            Arc::new(FbxWriter::default()),
            Arc::new(GlbWriter::default()),
        ];
        let stages: Vec<Arc<dyn PipelineStage>> = vec![
            Arc::new(IngestionStage::new(Arc::new(StrictPhotoValidator))),
            Arc::new(PreprocessingStage::new(Arc::new(LandmarkAligner))),
            Arc::new(ReconstructionStage::new(
                Arc::new(DecaReconstructor::new(
                    settings.deca_model_path.clone(),
                    settings.gpu_enabled,
                )),
                Arc::new(UvTextureGenerator),
            )),
            Arc::new(RiggingStage::new(
                Arc::new(SkeletonRigger),
                Arc::new(ManifestBlendshapeExporter),
            )),
            Arc::new(PackagingStage::new(writers, settings.asset_base())),
        ];
        Self::new(store, stages, settings)
    }

    pub fn store(&self) -> Arc<dyn JobStore> {
        Arc::clone(&self.store)
    }

    /// Execute every stage for the given job.
    ///
    /// On the first stage failure the job is marked FAILED with the
    /// stage's error message, progress frozen at the last completed
    /// stage, and the error is returned. Assets are persisted only
    /// after all stages succeed; a failed run leaves no asset rows.
    pub async fn run(&self, job_id: Uuid) -> Result<PipelineContext, PipelineError> {
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or(PipelineError::JobNotFound(job_id))?;

        match job.status() {
            JobStatus::Running | JobStatus::Success => {
                return Err(PipelineError::InvalidState {
                    job_id,
                    status: job.status().as_str(),
                });
            }
            JobStatus::Pending | JobStatus::Failed => {}
        }

        let mut context = match self.build_context(&job).await {
            Ok(context) => context,
            Err(err) => {
                self.store.mark_failure(job_id, &err.to_string()).await?;
                return Err(err);
            }
        };
        self.store.begin_run(job_id, INITIAL_PROGRESS).await?;

        let total = self.stages.len();
        for (index, stage) in self.stages.iter().enumerate() {
            tracing::info!(%job_id, stage = stage.name(), "running pipeline stage");
            if let Err(err) = stage.run(&mut context).await {
                let message = err.to_string();
                tracing::warn!(%job_id, stage = stage.name(), error = %message, "pipeline stage failed");
                self.store.mark_failure(job_id, &message).await?;
                return Err(err);
            }
            let progress = round_progress((index + 1) as f64 / total as f64);
            self.store
                .update_status(
                    job_id,
                    JobStatus::Running,
                    StatusUpdate {
                        progress: Some(progress),
                        ..Default::default()
                    },
                )
                .await?;
        }

        for (asset_type, entry) in &context.assets {
            let mut metadata = entry.metadata.clone();
            metadata.insert(
                "file_path".to_string(),
                json!(entry.file_path.display().to_string()),
            );
            self.store
                .add_asset(job_id, asset_type, &entry.uri, serde_json::Value::Object(metadata))
                .await?;
        }

        self.store
            .mark_success(job_id, json!({ "assets": context.assets }))
            .await?;
        tracing::info!(%job_id, assets = context.assets.len(), "pipeline run succeeded");

        Ok(context)
    }

    async fn build_context(&self, job: &Job) -> Result<PipelineContext, PipelineError> {
        let sources: Vec<PhotoSource> =
            serde_json::from_value(job.input_payload["photos"].clone()).map_err(|err| {
                PipelineError::Validation(format!("Malformed photos payload: {err}"))
            })?;

        self.settings.ensure_directories()?;
        let temp_dir = self.settings.temp_storage_path.join(job.id.to_string());
        let output_dir = self.settings.output_path.join(job.id.to_string());
        tokio::fs::create_dir_all(&temp_dir).await?;
        tokio::fs::create_dir_all(&output_dir).await?;

        Ok(PipelineContext::new(
            job.id,
            job.user_id.clone(),
            sources,
            temp_dir,
            output_dir,
        ))
    }
}

/// Round to four decimal places, matching the stored progress grain.
fn round_progress(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- round_progress ------------------------------------------------

    #[test]
    fn rounds_to_four_decimal_places() {
        assert_eq!(round_progress(1.0 / 3.0), 0.3333);
        assert_eq!(round_progress(5.0 / 6.0), 0.8333);
        assert_eq!(round_progress(1.0), 1.0);
    }
}
