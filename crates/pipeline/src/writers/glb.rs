//! GLB asset writer with engine import metadata.

use std::path::Path;

use async_trait::async_trait;
use persona_core::artifacts::{MeshResult, RiggingResult};
use serde_json::json;
use uuid::Uuid;

use super::{
    checksum_sha256, engine_metadata, write_sidecar, AssetWriteResult, AssetWriter,
    DEFAULT_ENGINE_VERSION, DEFAULT_SCALE,
};
use crate::capabilities::CapabilityError;

/// Writes a glTF-binary asset named `<job_id>.glb`.
#[derive(Debug)]
pub struct GlbWriter {
    engine_version: String,
    scale: f64,
}

impl GlbWriter {
    pub fn new(engine_version: impl Into<String>, scale: f64) -> Self {
        Self {
            engine_version: engine_version.into(),
            scale,
        }
    }
}

impl Default for GlbWriter {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_VERSION, DEFAULT_SCALE)
    }
}

#[async_trait]
impl AssetWriter for GlbWriter {
    fn asset_type(&self) -> &'static str {
        "GLB"
    }

    async fn write(
        &self,
        job_id: Uuid,
        mesh: &MeshResult,
        texture_path: &Path,
        rigging: &RiggingResult,
        output_dir: &Path,
    ) -> Result<AssetWriteResult, CapabilityError> {
        tokio::fs::create_dir_all(output_dir).await?;

        let asset_path = output_dir.join(format!("{job_id}.glb"));
        let payload: &[u8] = b"glTF-binary placeholder";
        tokio::fs::write(&asset_path, payload).await?;

        let mut metadata = engine_metadata(&self.engine_version, self.scale, rigging);
        metadata.insert("asset_type".to_string(), json!(self.asset_type()));
        metadata.insert("mesh".to_string(), json!(mesh.mesh_path));
        metadata.insert("texture".to_string(), json!(texture_path));
        metadata.insert("skeleton".to_string(), json!(rigging.skeleton_path));
        metadata.insert("checksum_sha256".to_string(), json!(checksum_sha256(payload)));

        write_sidecar(&asset_path, ".glb", &mut metadata).await?;

        Ok(AssetWriteResult {
            asset_type: self.asset_type(),
            file_path: asset_path,
            metadata,
        })
    }
}
