//! The job persistence contract used by the stage runner.
//!
//! [`JobStore`] is injectable: the runner, queue, and HTTP adapter all
//! hold an `Arc<dyn JobStore>`. [`PgJobStore`] backs production on
//! Postgres; [`MemoryJobStore`] backs tests and local experimentation.
//!
//! Every mutating operation commits independently (one short transaction
//! per status transition), so concurrent readers observe per-stage
//! progress as soon as the runner persists it.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use persona_db::models::asset::GeneratedAsset;
use persona_db::models::job::{Job, StatusUpdate};
use persona_db::models::status::JobStatus;

pub use memory::MemoryJobStore;
pub use postgres::PgJobStore;

/// Failure raised by a job store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable record of jobs and their produced assets.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Create a new job in PENDING status with zero progress.
    async fn create_job(
        &self,
        user_id: &str,
        input_payload: serde_json::Value,
    ) -> Result<Job, StoreError>;

    /// Read a job by id.
    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError>;

    /// Apply a status transition with a partial field update; `None`
    /// fields are left unchanged.
    async fn update_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
        update: StatusUpdate,
    ) -> Result<(), StoreError>;

    /// Transition to RUNNING with the nominal initial progress,
    /// clearing any error message from a previous failed run.
    async fn begin_run(&self, job_id: Uuid, initial_progress: f64) -> Result<(), StoreError>;

    /// Record a packaged asset for a job.
    async fn add_asset(
        &self,
        job_id: Uuid,
        asset_type: &str,
        uri: &str,
        metadata: serde_json::Value,
    ) -> Result<GeneratedAsset, StoreError>;

    /// List all assets for a job; empty for an unknown id.
    async fn list_assets(&self, job_id: Uuid) -> Result<Vec<GeneratedAsset>, StoreError>;

    /// Mark the job FAILED with the given message. Progress is left at
    /// the last completed stage.
    async fn mark_failure(&self, job_id: Uuid, message: &str) -> Result<(), StoreError> {
        self.update_status(
            job_id,
            JobStatus::Failed,
            StatusUpdate {
                error_message: Some(message.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    /// Mark the job SUCCESS with full progress and the output payload.
    async fn mark_success(
        &self,
        job_id: Uuid,
        output_payload: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.update_status(
            job_id,
            JobStatus::Success,
            StatusUpdate {
                progress: Some(1.0),
                output_payload: Some(output_payload),
                ..Default::default()
            },
        )
        .await
    }
}
