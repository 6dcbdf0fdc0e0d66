//! Intermediate artifacts handed from one pipeline stage to the next.
//!
//! Each value is produced by exactly one stage and only read afterwards;
//! ownership moves forward through the [`PipelineContext`]
//! (crate::context::PipelineContext) and no later stage mutates it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::photos::Photo;

/// A face-aligned image ready for reconstruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedImage {
    pub source_photo: Photo,
    pub aligned_path: PathBuf,
    /// Landmark reference file, when the aligner produced one.
    pub landmarks_path: Option<PathBuf>,
}

/// Meshes produced by the reconstruction stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshResult {
    pub mesh_path: PathBuf,
    pub neutral_mesh_path: Option<PathBuf>,
    /// Per-expression blendshape coefficients keyed by expression name.
    pub expression_coefficients: BTreeMap<String, f64>,
}

/// Output of the rigging stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiggingResult {
    pub skeleton_path: PathBuf,
    pub blendshape_path: PathBuf,
    /// Default rig control values keyed by control name.
    pub controls: BTreeMap<String, f64>,
}

/// One packaged asset recorded by the packaging stage, keyed in the
/// context's asset map by the producing writer's asset type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Public URI under the configured asset base URL.
    pub uri: String,
    /// Local path of the written asset file.
    pub file_path: PathBuf,
    /// Writer-specific metadata (engine version, provenance paths, checksum).
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
