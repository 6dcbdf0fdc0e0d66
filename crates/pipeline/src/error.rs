//! Error taxonomy for pipeline execution.

use uuid::Uuid;

use crate::store::StoreError;

/// Failures surfaced by the stage runner and its collaborators.
///
/// Stage failures carry the originating stage's name so the persisted
/// error message identifies where the run stopped.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Bad input shape or content, caught before any stage work runs.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A stage's work failed, including unmet preconditions.
    #[error("Stage {stage} failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },

    /// The job id has no persisted record.
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    /// The job's stored status forbids (re-)execution.
    #[error("Job {job_id} is {status} and cannot be re-executed")]
    InvalidState {
        job_id: Uuid,
        status: &'static str,
    },

    /// A job store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Directory creation or another filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
