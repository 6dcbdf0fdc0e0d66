//! Pluggable asset writers.
//!
//! A writer serializes final pipeline results into one distributable
//! output format. Every writer emits a primary asset file plus a
//! `.metadata.json` sidecar; the metadata merges engine import settings
//! with mesh/texture/rig provenance paths and a SHA-256 checksum of the
//! primary file.

pub mod fbx;
pub mod glb;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use persona_core::artifacts::{MeshResult, RiggingResult};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::capabilities::CapabilityError;

pub use fbx::FbxWriter;
pub use glb::GlbWriter;

/// Target engine version stamped into writer metadata by default.
pub const DEFAULT_ENGINE_VERSION: &str = "2022.3";

/// Default mesh scale factor applied on import.
pub const DEFAULT_SCALE: f64 = 1.0;

/// A file emitted by an asset writer.
#[derive(Debug, Clone)]
pub struct AssetWriteResult {
    /// The writer's fixed format tag.
    pub asset_type: &'static str,
    /// Location of the primary asset file.
    pub file_path: PathBuf,
    /// Merged writer metadata, including the sidecar location.
    pub metadata: Map<String, Value>,
}

/// Serializes pipeline output to one specific distributable format.
///
/// The asset type tag is fixed per implementation so the packaging stage
/// can key results without collision when multiple writers run.
#[async_trait]
pub trait AssetWriter: Send + Sync {
    /// The writer's fixed format tag, e.g. `"GLB"`.
    fn asset_type(&self) -> &'static str;

    /// Write the primary asset file and its metadata sidecar into
    /// `output_dir`, creating the directory if absent.
    async fn write(
        &self,
        job_id: Uuid,
        mesh: &MeshResult,
        texture_path: &Path,
        rigging: &RiggingResult,
        output_dir: &Path,
    ) -> Result<AssetWriteResult, CapabilityError>;
}

/// Engine import settings merged into every writer's metadata.
pub(crate) fn engine_metadata(
    engine_version: &str,
    scale: f64,
    rigging: &RiggingResult,
) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("engine_version".to_string(), json!(engine_version));
    metadata.insert("scale".to_string(), json!(scale));
    metadata.insert("default_controls".to_string(), json!(rigging.controls));
    metadata
}

/// Lower-case hex SHA-256 digest of the written asset bytes.
pub(crate) fn checksum_sha256(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Write the metadata sidecar next to the asset file and record its path
/// in the metadata map.
pub(crate) async fn write_sidecar(
    asset_path: &Path,
    extension: &str,
    metadata: &mut Map<String, Value>,
) -> Result<(), CapabilityError> {
    let file_name = asset_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let metadata_path = asset_path.with_file_name(format!("{file_name}.metadata.json"));
    debug_assert!(file_name.ends_with(extension));

    tokio::fs::write(
        &metadata_path,
        serde_json::to_vec_pretty(&Value::Object(metadata.clone()))?,
    )
    .await?;
    metadata.insert("metadata_path".to_string(), json!(metadata_path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_hex() {
        let digest = checksum_sha256(b"glTF-binary placeholder");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, checksum_sha256(b"glTF-binary placeholder"));
    }

    #[test]
    fn engine_metadata_contains_controls() {
        let rigging = RiggingResult {
            skeleton_path: "skeleton.json".into(),
            blendshape_path: "blendshapes.json".into(),
            controls: [("jaw_open".to_string(), 0.0)].into(),
        };
        let metadata = engine_metadata(DEFAULT_ENGINE_VERSION, DEFAULT_SCALE, &rigging);
        assert_eq!(metadata["engine_version"], json!("2022.3"));
        assert_eq!(metadata["scale"], json!(1.0));
        assert_eq!(metadata["default_controls"]["jaw_open"], json!(0.0));
    }
}
