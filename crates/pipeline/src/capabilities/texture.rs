//! Texture map generation keyed on a reconstructed mesh.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use persona_core::artifacts::{AlignedImage, MeshResult};
use serde_json::json;

use super::{CapabilityError, TextureGenerator};

/// Produces an albedo texture plus a JSON manifest tying it back to the
/// mesh and source images, under `<scratch>/textures/`.
#[derive(Debug, Default)]
pub struct UvTextureGenerator;

#[async_trait]
impl TextureGenerator for UvTextureGenerator {
    async fn generate(
        &self,
        images: &[AlignedImage],
        mesh: &MeshResult,
        scratch_dir: &Path,
    ) -> Result<PathBuf, CapabilityError> {
        let texture_dir = scratch_dir.join("textures");
        tokio::fs::create_dir_all(&texture_dir).await?;

        let texture_path = texture_dir.join("albedo.png");
        let manifest_path = texture_dir.join("albedo.json");

        tokio::fs::write(&texture_path, "texture placeholder").await?;
        let manifest = json!({
            "mesh": mesh.mesh_path,
            "aligned_images": images.iter().map(|img| &img.aligned_path).collect::<Vec<_>>(),
        });
        tokio::fs::write(&manifest_path, serde_json::to_vec(&manifest)?).await?;

        Ok(texture_path)
    }
}
