//! Face alignment producing aligned images and landmark references.

use std::path::Path;

use async_trait::async_trait;
use persona_core::artifacts::AlignedImage;
use persona_core::photos::Photo;
use serde_json::json;

use super::{CapabilityError, FaceAligner};

/// Writes one aligned image and one landmark JSON file per source photo
/// under `<scratch>/alignment/`.
#[derive(Debug, Default)]
pub struct LandmarkAligner;

#[async_trait]
impl FaceAligner for LandmarkAligner {
    async fn align(
        &self,
        photos: &[Photo],
        scratch_dir: &Path,
    ) -> Result<Vec<AlignedImage>, CapabilityError> {
        let alignment_dir = scratch_dir.join("alignment");
        tokio::fs::create_dir_all(&alignment_dir).await?;

        let mut aligned = Vec::with_capacity(photos.len());
        for (index, photo) in photos.iter().enumerate() {
            let aligned_path = alignment_dir.join(format!("aligned_{index}.png"));
            tokio::fs::write(
                &aligned_path,
                format!("aligned image placeholder for {}\n", photo.url),
            )
            .await?;

            let landmarks_path = alignment_dir.join(format!("aligned_{index}_landmarks.json"));
            let landmarks = json!({
                "photo_url": photo.url,
                "landmarks": [0, 0, 1, 1],
                "id": uuid::Uuid::new_v4().simple().to_string(),
            });
            tokio::fs::write(&landmarks_path, serde_json::to_vec(&landmarks)?).await?;

            aligned.push(AlignedImage {
                source_photo: photo.clone(),
                aligned_path,
                landmarks_path: Some(landmarks_path),
            });
        }
        Ok(aligned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(url: &str) -> Photo {
        Photo {
            url: url.to_string(),
            width: 512,
            height: 512,
            metadata: Default::default(),
        }
    }

    #[tokio::test]
    async fn writes_one_aligned_image_per_photo() {
        let scratch = tempfile::tempdir().unwrap();
        let aligner = LandmarkAligner;
        let photos = [photo("https://x/a.jpg"), photo("https://x/b.jpg")];

        let aligned = aligner.align(&photos, scratch.path()).await.unwrap();

        assert_eq!(aligned.len(), 2);
        for image in &aligned {
            assert!(image.aligned_path.exists());
            assert!(image.landmarks_path.as_ref().unwrap().exists());
        }
    }

    #[tokio::test]
    async fn empty_photo_list_yields_empty_output() {
        let scratch = tempfile::tempdir().unwrap();
        let aligned = LandmarkAligner.align(&[], scratch.path()).await.unwrap();
        assert!(aligned.is_empty());
    }
}
