//! FBX asset writer with engine import metadata.

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

/// Writes an FBX asset named `<job_id>.fbx`.
#[derive(Debug)]
pub struct FbxWriter {
    engine_version: String,
    scale: f64,
}

impl FbxWriter {
    pub fn new(engine_version: impl Into<String>, scale: f64) -> Self {
        Self {
            engine_version: engine_version.into(),
            scale,
        }
    }
}

impl Default for FbxWriter {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_VERSION, DEFAULT_SCALE)
    }
}

#[async_trait]
impl AssetWriter for FbxWriter {
    fn asset_type(&self) -> &'static str {
        "FBX"
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

        let asset_path = output_dir.join(format!("{job_id}.fbx"));
        let payload = format!("FBX placeholder generated for job {job_id}\n");
        tokio::fs::write(&asset_path, &payload).await?;

        let mut metadata = engine_metadata(&self.engine_version, self.scale, rigging);
        metadata.insert("asset_type".to_string(), json!(self.asset_type()));
        metadata.insert("mesh".to_string(), json!(mesh.mesh_path));
        metadata.insert("texture".to_string(), json!(texture_path));
        metadata.insert(
            "checksum_sha256".to_string(),
            json!(checksum_sha256(payload.as_bytes())),
        );

        write_sidecar(&asset_path, ".fbx", &mut metadata).await?;

        Ok(AssetWriteResult {
            asset_type: self.asset_type(),
            file_path: asset_path,
            metadata,
        })
    }
}
