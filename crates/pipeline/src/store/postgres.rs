//! Postgres-backed job store delegating to the `persona_db` repositories.

use async_trait::async_trait;
use persona_db::models::asset::GeneratedAsset;
use persona_db::models::job::{Job, StatusUpdate};
use persona_db::models::status::JobStatus;
use persona_db::repositories::{AssetRepo, JobRepo};
use persona_db::DbPool;
use uuid::Uuid;

use super::{JobStore, StoreError};

/// Production [`JobStore`] backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create_job(
        &self,
        user_id: &str,
        input_payload: serde_json::Value,
    ) -> Result<Job, StoreError> {
        Ok(JobRepo::create(&self.pool, user_id, &input_payload).await?)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(JobRepo::find_by_id(&self.pool, job_id).await?)
    }

    async fn update_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
        update: StatusUpdate,
    ) -> Result<(), StoreError> {
        Ok(JobRepo::update_status(&self.pool, job_id, status, &update).await?)
    }

    async fn begin_run(&self, job_id: Uuid, initial_progress: f64) -> Result<(), StoreError> {
        Ok(JobRepo::begin_run(&self.pool, job_id, initial_progress).await?)
    }

    async fn add_asset(
        &self,
        job_id: Uuid,
        asset_type: &str,
        uri: &str,
        metadata: serde_json::Value,
    ) -> Result<GeneratedAsset, StoreError> {
        Ok(AssetRepo::add(&self.pool, job_id, asset_type, uri, &metadata).await?)
    }

    async fn list_assets(&self, job_id: Uuid) -> Result<Vec<GeneratedAsset>, StoreError> {
        Ok(AssetRepo::list_by_job(&self.pool, job_id).await?)
    }
}
