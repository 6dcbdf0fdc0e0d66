//! Handlers for the `/avatar/jobs` resource.
//!
//! Job creation persists the record before validating the photo
//! payload, so a rejected request still leaves an inspectable PENDING
//! job row. Only validated jobs are handed to the queue.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use persona_core::error::CoreError;
use persona_core::photos::{validate_photos, PhotoSource};
use persona_core::types::{JobId, Timestamp};
use persona_db::models::job::Job;
use persona_worker::QueueState;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Request body for POST /avatar/jobs.
#[derive(Debug, Deserialize)]
pub struct CreateAvatarJob {
    pub user_id: String,
    #[serde(default)]
    pub photos: Vec<PhotoSource>,
}

/// A job as exposed over HTTP, with the lookup-table status id
/// replaced by its name and the live queue state attached.
#[derive(Debug, Serialize)]
pub struct JobView {
    pub id: JobId,
    pub user_id: String,
    pub status: &'static str,
    pub progress: f64,
    pub error_message: Option<String>,
    pub output_payload: Option<serde_json::Value>,
    pub queue_state: &'static str,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobView {
    fn from_job(job: Job, queue_state: QueueState) -> Self {
        Self {
            id: job.id,
            status: job.status().as_str(),
            queue_state: queue_state.as_str(),
            user_id: job.user_id,
            progress: job.progress,
            error_message: job.error_message,
            output_payload: job.output_payload,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /avatar/jobs
///
/// Create an avatar job and enqueue it for background execution.
/// Returns 201 with the created job. An invalid photo payload returns
/// 400; the job row is kept in PENDING and never enqueued.
pub async fn create_job(
    State(state): State<AppState>,
    Json(input): Json<CreateAvatarJob>,
) -> AppResult<impl IntoResponse> {
    if input.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".to_string()));
    }

    let payload = json!({ "photos": input.photos });
    let job = state.store.create_job(&input.user_id, payload).await?;

    if let Err(err) = validate_photos(&input.photos) {
        tracing::info!(job_id = %job.id, error = %err, "Avatar job rejected by validation");
        return Err(AppError::Core(err));
    }

    state.queue.submit(job.id).await?;
    tracing::info!(job_id = %job.id, user_id = %job.user_id, "Avatar job enqueued");

    let view = JobView::from_job(job, QueueState::Pending);
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /avatar/jobs/{id}
///
/// Fetch a job with its persisted status, progress, and live queue
/// state.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .store
        .get_job(job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    let queue_state = state.queue.status(job_id).await;
    Ok(Json(DataResponse {
        data: JobView::from_job(job, queue_state),
    }))
}

/// GET /avatar/jobs/{id}/assets
///
/// List the assets produced by a job. Empty until the job succeeds.
pub async fn list_assets(
    State(state): State<AppState>,
    Path(job_id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    if state.store.get_job(job_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }));
    }

    let assets = state.store.list_assets(job_id).await?;
    Ok(Json(DataResponse { data: assets }))
}
