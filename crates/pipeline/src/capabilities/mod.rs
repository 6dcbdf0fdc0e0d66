//! External capability contracts consumed by the pipeline stages.
//!
//! Each trait is the interface boundary to an algorithmic collaborator
//! (validation heuristics, face alignment, mesh reconstruction, texture
//! synthesis, rigging, blendshape export). The local implementations in
//! the submodules emit placeholder artifact files and JSON manifests so
//! the full pipeline is runnable end to end without model weights; a
//! production deployment swaps them at composition time.

pub mod aligner;
pub mod reconstruction;
pub mod rigging;
pub mod texture;
pub mod validator;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use persona_core::artifacts::{AlignedImage, MeshResult, RiggingResult};
use persona_core::photos::{Photo, PhotoSource};

pub use aligner::LandmarkAligner;
pub use reconstruction::DecaReconstructor;
pub use rigging::{ManifestBlendshapeExporter, SkeletonRigger};
pub use texture::UvTextureGenerator;
pub use validator::StrictPhotoValidator;

/// Failure raised by a capability implementation.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// Input does not satisfy the capability's contract.
    #[error("{0}")]
    Invalid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validates inbound photos against quality thresholds.
#[async_trait]
pub trait PhotoValidator: Send + Sync {
    /// Validate the submitted photos, returning the canonical list.
    async fn validate(&self, photos: &[PhotoSource]) -> Result<Vec<Photo>, CapabilityError>;
}

/// Aligns faces and produces landmark files for downstream stages.
#[async_trait]
pub trait FaceAligner: Send + Sync {
    /// Produce one aligned image (plus optional landmark reference) per photo.
    async fn align(
        &self,
        photos: &[Photo],
        scratch_dir: &Path,
    ) -> Result<Vec<AlignedImage>, CapabilityError>;
}

/// Reconstructs a 3D head mesh from aligned images.
#[async_trait]
pub trait MeshReconstructor: Send + Sync {
    /// Fails when given no images.
    async fn reconstruct(
        &self,
        images: &[AlignedImage],
        scratch_dir: &Path,
    ) -> Result<MeshResult, CapabilityError>;
}

/// Produces texture maps keyed on a reconstructed mesh.
#[async_trait]
pub trait TextureGenerator: Send + Sync {
    /// Returns the location of the generated albedo texture.
    async fn generate(
        &self,
        images: &[AlignedImage],
        mesh: &MeshResult,
        scratch_dir: &Path,
    ) -> Result<PathBuf, CapabilityError>;
}

/// Generates skeleton and control rig data for a mesh.
#[async_trait]
pub trait RiggingEngine: Send + Sync {
    async fn rig(
        &self,
        mesh: &MeshResult,
        texture_path: &Path,
        scratch_dir: &Path,
    ) -> Result<RiggingResult, CapabilityError>;
}

/// Serializes blendshape data for animation systems.
///
/// The exported manifest is a side effect; it is not carried forward in
/// the pipeline context.
#[async_trait]
pub trait BlendshapeExporter: Send + Sync {
    /// Returns the location of the written manifest.
    async fn export(
        &self,
        rigging: &RiggingResult,
        scratch_dir: &Path,
    ) -> Result<PathBuf, CapabilityError>;
}
