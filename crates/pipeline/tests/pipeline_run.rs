//! End to end runs of the stage pipeline against the in-memory store.

use std::path::PathBuf;
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use persona_core::config::Settings;
use persona_core::context::PipelineContext;
use persona_db::models::status::JobStatus;
use persona_pipeline::capabilities::{
    DecaReconstructor, LandmarkAligner, ManifestBlendshapeExporter, SkeletonRigger,
    StrictPhotoValidator, UvTextureGenerator,
};
use persona_pipeline::stages::{
    IngestionStage, PackagingStage, PreprocessingStage, ReconstructionStage, RiggingStage,
};
use persona_pipeline::store::MemoryJobStore;
use persona_pipeline::writers::{AssetWriter, FbxWriter, GlbWriter};
use persona_pipeline::{JobStore, PipelineError, PipelineRunner, PipelineStage};
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

const ASSET_BASE: &str = "http://assets.test/avatars";

fn test_settings(root: &TempDir) -> Settings {
    Settings {
        database_url: String::new(),
        temp_storage_path: root.path().join("tmp"),
        output_path: root.path().join("out"),
        asset_base_url: ASSET_BASE.to_string(),
        deca_model_path: root.path().join("models/deca"),
        gpu_enabled: false,
        worker_count: 2,
    }
}

fn valid_photos_payload() -> serde_json::Value {
    json!({
        "photos": [
            {"url": "https://cdn.test/front.jpg", "width": 1024, "height": 1024},
            {"url": "https://cdn.test/side.png", "width": 512, "height": 512},
        ]
    })
}

fn default_stages(settings: &Settings) -> Vec<Arc<dyn PipelineStage>> {
    let writers: Vec<Arc<dyn AssetWriter>> = vec![
        Arc::new(FbxWriter::default()),
        Arc::new(GlbWriter::default()),
    ];
    vec![
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
    ]
}

/// A stage that always fails, for exercising the failure path after a
/// run of successful stages.
struct DoomedStage;

#[async_trait]
impl PipelineStage for DoomedStage {
    fn name(&self) -> &'static str {
        "doomed"
    }

    async fn run(&self, _context: &mut PipelineContext) -> Result<(), PipelineError> {
        Err(PipelineError::Stage {
            stage: self.name(),
            message: "simulated stage crash".to_string(),
        })
    }
}

// -- success path ------------------------------------------------------

#[tokio::test]
async fn full_run_succeeds_and_persists_assets() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());
    let runner = PipelineRunner::with_default_stages(store.clone(), settings);

    let job = store
        .create_job("user-1", valid_photos_payload())
        .await
        .unwrap();
    let context = runner.run(job.id).await.unwrap();

    let stored = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), JobStatus::Success);
    assert_eq!(stored.progress, 1.0);
    assert_eq!(stored.error_message, None);

    let output = stored.output_payload.unwrap();
    assert!(output["assets"]["FBX"].is_object());
    assert!(output["assets"]["GLB"].is_object());

    let assets = store.list_assets(job.id).await.unwrap();
    assert_eq!(assets.len(), 2);
    for asset in &assets {
        assert!(asset.uri.starts_with(ASSET_BASE));
        assert!(asset.metadata["file_path"].is_string());
        let path = PathBuf::from(asset.metadata["file_path"].as_str().unwrap());
        assert!(path.is_file(), "missing asset file {}", path.display());
    }

    // Each writer produced an entry plus a sidecar next to it.
    for entry in context.assets.values() {
        let sidecar = entry.metadata["metadata_path"].as_str().unwrap();
        assert!(PathBuf::from(sidecar).is_file());
    }
}

#[tokio::test]
async fn progress_advances_monotonically_per_stage() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());
    let runner = PipelineRunner::with_default_stages(store.clone(), settings);

    let job = store
        .create_job("user-1", valid_photos_payload())
        .await
        .unwrap();
    runner.run(job.id).await.unwrap();

    let transitions = store.transitions(job.id).await;
    assert_eq!(transitions.first(), Some(&(JobStatus::Running, 0.01)));
    assert_eq!(transitions.last(), Some(&(JobStatus::Success, 1.0)));
    // One transition per stage between pickup and the terminal write.
    assert_eq!(transitions.len(), 7);
    for pair in transitions.windows(2) {
        assert!(pair[1].1 >= pair[0].1, "progress regressed: {pair:?}");
    }
}

#[tokio::test]
async fn retry_after_failure_clears_stale_error() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());
    let runner = PipelineRunner::with_default_stages(store.clone(), settings);

    let job = store
        .create_job("user-1", valid_photos_payload())
        .await
        .unwrap();
    store.mark_failure(job.id, "worker crashed").await.unwrap();

    runner.run(job.id).await.unwrap();

    let stored = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), JobStatus::Success);
    assert_eq!(stored.error_message, None);
}

// -- failure path ------------------------------------------------------

#[tokio::test]
async fn failing_stage_marks_job_failed_and_freezes_progress() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());

    let mut stages = default_stages(&settings);
    stages.push(Arc::new(DoomedStage));
    let runner = PipelineRunner::new(store.clone(), stages, settings);

    let job = store
        .create_job("user-1", valid_photos_payload())
        .await
        .unwrap();
    let err = runner.run(job.id).await.unwrap_err();
    assert_matches!(err, PipelineError::Stage { stage: "doomed", .. });

    let stored = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), JobStatus::Failed);
    // Five of six stages completed before the failure.
    assert_eq!(stored.progress, 0.8333);
    let message = stored.error_message.unwrap();
    assert!(message.contains("doomed"), "unexpected message: {message}");
    assert!(message.contains("simulated stage crash"));

    // No assets are persisted for a failed run.
    assert!(store.list_assets(job.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_photo_list_fails_in_ingestion() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());
    let runner = PipelineRunner::with_default_stages(store.clone(), settings);

    let job = store
        .create_job("user-1", json!({"photos": []}))
        .await
        .unwrap();
    let err = runner.run(job.id).await.unwrap_err();
    assert_matches!(err, PipelineError::Stage { stage: "ingestion", .. });

    let stored = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), JobStatus::Failed);
    // No stage completed, so progress stays at the pickup value.
    assert_eq!(stored.progress, 0.01);
    assert!(stored
        .error_message
        .unwrap()
        .contains("At least one photo is required"));
}

#[tokio::test]
async fn malformed_photos_payload_fails_before_any_stage() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());
    let runner = PipelineRunner::with_default_stages(store.clone(), settings);

    let job = store
        .create_job("user-1", json!({"photos": 42}))
        .await
        .unwrap();
    let err = runner.run(job.id).await.unwrap_err();
    assert_matches!(err, PipelineError::Validation(_));

    let stored = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), JobStatus::Failed);
    assert!(stored
        .error_message
        .unwrap()
        .contains("Malformed photos payload"));
}

#[tokio::test]
async fn packaging_without_upstream_results_fails_fast() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());

    let writers: Vec<Arc<dyn AssetWriter>> = vec![Arc::new(GlbWriter::default())];
    let stages: Vec<Arc<dyn PipelineStage>> =
        vec![Arc::new(PackagingStage::new(writers, ASSET_BASE))];
    let runner = PipelineRunner::new(store.clone(), stages, settings);

    let job = store
        .create_job("user-1", valid_photos_payload())
        .await
        .unwrap();
    let err = runner.run(job.id).await.unwrap_err();
    assert_matches!(err, PipelineError::Stage { stage: "packaging", .. });

    let stored = store.get_job(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status(), JobStatus::Failed);
    assert!(store.list_assets(job.id).await.unwrap().is_empty());
}

// -- execution guards --------------------------------------------------

#[tokio::test]
async fn unknown_job_is_reported_not_found() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());
    let runner = PipelineRunner::with_default_stages(store, settings);

    let missing = Uuid::new_v4();
    let err = runner.run(missing).await.unwrap_err();
    assert_matches!(err, PipelineError::JobNotFound(id) if id == missing);
}

#[tokio::test]
async fn running_and_succeeded_jobs_are_not_re_executed() {
    let root = TempDir::new().unwrap();
    let settings = test_settings(&root);
    let store = Arc::new(MemoryJobStore::new());
    let runner = PipelineRunner::with_default_stages(store.clone(), settings);

    let job = store
        .create_job("user-1", valid_photos_payload())
        .await
        .unwrap();
    runner.run(job.id).await.unwrap();

    let err = runner.run(job.id).await.unwrap_err();
    assert_matches!(
        err,
        PipelineError::InvalidState {
            status: "SUCCESS",
            ..
        }
    );

    store.begin_run(job.id, 0.01).await.unwrap();
    let err = runner.run(job.id).await.unwrap_err();
    assert_matches!(
        err,
        PipelineError::InvalidState {
            status: "RUNNING",
            ..
        }
    );
}
