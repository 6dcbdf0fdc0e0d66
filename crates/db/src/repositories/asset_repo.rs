//! Repository for the `avatar_assets` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::asset::GeneratedAsset;

/// Column list for `avatar_assets` queries.
const COLUMNS: &str = "id, job_id, asset_type, uri, metadata, created_at";

/// Provides insert and list operations for generated assets.
///
/// Assets are append-only; no update or delete methods exist.
pub struct AssetRepo;

impl AssetRepo {
    /// Record a packaged asset for a job.
    pub async fn add(
        pool: &PgPool,
        job_id: Uuid,
        asset_type: &str,
        uri: &str,
        metadata: &serde_json::Value,
    ) -> Result<GeneratedAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO avatar_assets (id, job_id, asset_type, uri, metadata) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneratedAsset>(&query)
            .bind(Uuid::new_v4())
            .bind(job_id)
            .bind(asset_type)
            .bind(uri)
            .bind(metadata)
            .fetch_one(pool)
            .await
    }

    /// List all assets for a job, oldest first.
    ///
    /// Returns an empty list for an unknown job id; absence of the job
    /// is not an error at this layer.
    pub async fn list_by_job(
        pool: &PgPool,
        job_id: Uuid,
    ) -> Result<Vec<GeneratedAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM avatar_assets WHERE job_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, GeneratedAsset>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }
}
