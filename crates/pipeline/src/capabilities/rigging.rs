//! Rigging engine and blendshape export.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use persona_core::artifacts::{MeshResult, RiggingResult};
use serde_json::json;

use super::{BlendshapeExporter, CapabilityError, RiggingEngine};

/// Emits skeleton and control rig metadata under `<scratch>/rig/`.
#[derive(Debug, Default)]
pub struct SkeletonRigger;

#[async_trait]
impl RiggingEngine for SkeletonRigger {
    async fn rig(
        &self,
        mesh: &MeshResult,
        texture_path: &Path,
        scratch_dir: &Path,
    ) -> Result<RiggingResult, CapabilityError> {
        let rig_dir = scratch_dir.join("rig");
        tokio::fs::create_dir_all(&rig_dir).await?;

        let skeleton_path = rig_dir.join("skeleton.json");
        let blendshape_path = rig_dir.join("blendshapes.json");

        let skeleton = json!({
            "mesh": mesh.mesh_path,
            "neutral_mesh": mesh.neutral_mesh_path,
            "texture": texture_path,
        });
        tokio::fs::write(&skeleton_path, serde_json::to_vec(&skeleton)?).await?;
        tokio::fs::write(
            &blendshape_path,
            serde_json::to_vec(&mesh.expression_coefficients)?,
        )
        .await?;

        let controls: BTreeMap<String, f64> = [
            ("jaw_open".to_string(), 0.0),
            ("eye_blink_left".to_string(), 0.0),
            ("eye_blink_right".to_string(), 0.0),
        ]
        .into();

        Ok(RiggingResult {
            skeleton_path,
            blendshape_path,
            controls,
        })
    }
}

/// Writes the blendshape manifest consumed by game engine importers.
#[derive(Debug, Default)]
pub struct ManifestBlendshapeExporter;

#[async_trait]
impl BlendshapeExporter for ManifestBlendshapeExporter {
    async fn export(
        &self,
        rigging: &RiggingResult,
        scratch_dir: &Path,
    ) -> Result<PathBuf, CapabilityError> {
        let manifest_dir = scratch_dir.join("rig");
        tokio::fs::create_dir_all(&manifest_dir).await?;

        let manifest_path = manifest_dir.join("blendshape_manifest.json");
        let payload = json!({
            "blendshape_path": rigging.blendshape_path,
            "controls": rigging.controls,
        });
        tokio::fs::write(&manifest_path, serde_json::to_vec(&payload)?).await?;

        Ok(manifest_path)
    }
}
