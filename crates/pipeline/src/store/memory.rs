//! In-memory job store for tests and local experimentation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use persona_db::models::asset::GeneratedAsset;
use persona_db::models::job::{Job, StatusUpdate};
use persona_db::models::status::JobStatus;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{JobStore, StoreError};

#[derive(Default)]
struct MemoryInner {
    jobs: HashMap<Uuid, Job>,
    assets: Vec<GeneratedAsset>,
    /// Per-job history of `(status, progress)` pairs, in transition order.
    transitions: HashMap<Uuid, Vec<(JobStatus, f64)>>,
}

/// HashMap-backed [`JobStore`] with the same partial-update semantics as
/// the Postgres implementation.
///
/// Records the full transition history per job so tests can assert on
/// the exact sequence of persisted status updates.
#[derive(Default)]
pub struct MemoryJobStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored job, in no particular order.
    pub async fn jobs(&self) -> Vec<Job> {
        self.inner.read().await.jobs.values().cloned().collect()
    }

    /// The `(status, progress)` transitions persisted for a job, oldest
    /// first. Empty for an unknown id.
    pub async fn transitions(&self, job_id: Uuid) -> Vec<(JobStatus, f64)> {
        self.inner
            .read()
            .await
            .transitions
            .get(&job_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create_job(
        &self,
        user_id: &str,
        input_payload: serde_json::Value,
    ) -> Result<Job, StoreError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            status_id: JobStatus::Pending.id(),
            progress: 0.0,
            error_message: None,
            input_payload,
            output_payload: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.inner.read().await.jobs.get(&job_id).cloned())
    }

    async fn update_status(
        &self,
        job_id: Uuid,
        status: JobStatus,
        update: StatusUpdate,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(job) = inner.jobs.get_mut(&job_id) {
            job.status_id = status.id();
            if let Some(progress) = update.progress {
                job.progress = progress;
            }
            if let Some(message) = update.error_message {
                job.error_message = Some(message);
            }
            if let Some(payload) = update.output_payload {
                job.output_payload = Some(payload);
            }
            job.updated_at = Utc::now();
            let progress = job.progress;
            inner
                .transitions
                .entry(job_id)
                .or_default()
                .push((status, progress));
        }
        Ok(())
    }

    async fn begin_run(&self, job_id: Uuid, initial_progress: f64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(job) = inner.jobs.get_mut(&job_id) {
            job.status_id = JobStatus::Running.id();
            job.progress = initial_progress;
            job.error_message = None;
            job.updated_at = Utc::now();
            inner
                .transitions
                .entry(job_id)
                .or_default()
                .push((JobStatus::Running, initial_progress));
        }
        Ok(())
    }

    async fn add_asset(
        &self,
        job_id: Uuid,
        asset_type: &str,
        uri: &str,
        metadata: serde_json::Value,
    ) -> Result<GeneratedAsset, StoreError> {
        let asset = GeneratedAsset {
            id: Uuid::new_v4(),
            job_id,
            asset_type: asset_type.to_string(),
            uri: uri.to_string(),
            metadata,
            created_at: Utc::now(),
        };
        self.inner.write().await.assets.push(asset.clone());
        Ok(asset)
    }

    async fn list_assets(&self, job_id: Uuid) -> Result<Vec<GeneratedAsset>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .assets
            .iter()
            .filter(|asset| asset.job_id == job_id)
            .cloned()
            .collect())
    }
}
