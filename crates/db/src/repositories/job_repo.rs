//! Repository for the `avatar_jobs` table.
//!
//! Every mutating method commits independently: one short transaction
//! per status transition, so a concurrent reader always observes the
//! latest committed stage progress.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{Job, StatusUpdate};
use crate::models::status::JobStatus;

/// Column list for `avatar_jobs` queries.
const COLUMNS: &str = "\
    id, user_id, status_id, progress, error_message, \
    input_payload, output_payload, created_at, updated_at";

/// Provides CRUD operations for avatar generation jobs.
pub struct JobRepo;

impl JobRepo {
    /// Create a new job in PENDING status with zero progress.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        input_payload: &serde_json::Value,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO avatar_jobs (id, user_id, status_id, progress, input_payload) \
             VALUES ($1, $2, $3, 0.0, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(JobStatus::Pending.id())
            .bind(input_payload)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM avatar_jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a status transition with a partial field update.
    ///
    /// `None` fields in `update` are left unchanged (COALESCE), so a
    /// progress-only transition never clobbers a previous error message
    /// or output payload.
    pub async fn update_status(
        pool: &PgPool,
        job_id: Uuid,
        status: JobStatus,
        update: &StatusUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE avatar_jobs \
             SET status_id = $2, \
                 progress = COALESCE($3, progress), \
                 error_message = COALESCE($4, error_message), \
                 output_payload = COALESCE($5, output_payload), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(status.id())
        .bind(update.progress)
        .bind(update.error_message.as_deref())
        .bind(update.output_payload.as_ref())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Transition to RUNNING with the nominal initial progress and clear
    /// any error message left over from a previous failed run.
    pub async fn begin_run(
        pool: &PgPool,
        job_id: Uuid,
        initial_progress: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE avatar_jobs \
             SET status_id = $2, progress = $3, error_message = NULL, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(JobStatus::Running.id())
        .bind(initial_progress)
        .execute(pool)
        .await?;
        Ok(())
    }
}
