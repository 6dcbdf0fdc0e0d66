//! Job entity model and DTOs for the avatar pipeline engine.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use persona_core::types::Timestamp;

use super::status::{JobStatus, StatusId};

/// A row from the `avatar_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: Uuid,
    pub user_id: String,
    pub status_id: StatusId,
    /// Fraction of completed stages, `0.0..=1.0`. Exactly `1.0` iff the
    /// job finished successfully.
    pub progress: f64,
    /// Set iff `status_id` is FAILED.
    pub error_message: Option<String>,
    /// The original request; immutable after creation.
    pub input_payload: serde_json::Value,
    /// Set only on SUCCESS; summarizes the produced assets.
    pub output_payload: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Resolve the status ID to the enum.
    ///
    /// Falls back to `Pending` for an unknown ID, which cannot occur for
    /// rows written through [`JobRepo`](crate::repositories::JobRepo).
    pub fn status(&self) -> JobStatus {
        JobStatus::from_id(self.status_id).unwrap_or(JobStatus::Pending)
    }
}

/// Partial status update applied by `JobRepo::update_status`.
///
/// `None` fields are left unchanged in the database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdate {
    pub progress: Option<f64>,
    pub error_message: Option<String>,
    pub output_payload: Option<serde_json::Value>,
}
