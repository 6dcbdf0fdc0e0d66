//! Mutable working state threaded through one job's stage sequence.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::artifacts::{AlignedImage, AssetEntry, MeshResult, RiggingResult};
use crate::photos::{Photo, PhotoSource};
use crate::types::JobId;

/// Per-run, in-memory pipeline state.
///
/// Owned exclusively by one runner invocation; never persisted between
/// stages and never shared across concurrent job executions. The scratch
/// and output directories are allocated before the first stage runs, so
/// every stage can rely on them being present.
#[derive(Debug)]
pub struct PipelineContext {
    pub job_id: JobId,
    pub user_id: String,
    /// Raw photo list from the job's input payload.
    pub photo_sources: Vec<PhotoSource>,
    /// Validated photos, populated by the ingestion stage.
    pub photos: Vec<Photo>,
    pub aligned_images: Vec<AlignedImage>,
    pub mesh_result: Option<MeshResult>,
    pub texture_path: Option<PathBuf>,
    pub rigging_result: Option<RiggingResult>,
    /// Packaged assets keyed by writer asset type, in deterministic order.
    pub assets: BTreeMap<String, AssetEntry>,
    /// Per-job scratch directory.
    pub temp_dir: PathBuf,
    /// Per-job output directory for distributable assets.
    pub output_dir: PathBuf,
}

impl PipelineContext {
    /// Create a fresh context for one pipeline run.
    pub fn new(
        job_id: JobId,
        user_id: impl Into<String>,
        photo_sources: Vec<PhotoSource>,
        temp_dir: PathBuf,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            job_id,
            user_id: user_id.into(),
            photo_sources,
            photos: Vec::new(),
            aligned_images: Vec::new(),
            mesh_result: None,
            texture_path: None,
            rigging_result: None,
            assets: BTreeMap::new(),
            temp_dir,
            output_dir,
        }
    }
}
