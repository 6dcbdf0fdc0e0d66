//! The five concrete pipeline stages, in composition order:
//! ingestion, preprocessing, reconstruction, rigging, packaging.

pub mod ingestion;
pub mod packaging;
pub mod preprocessing;
pub mod reconstruction;
pub mod rigging;

pub use ingestion::IngestionStage;
pub use packaging::PackagingStage;
pub use preprocessing::PreprocessingStage;
pub use reconstruction::ReconstructionStage;
pub use rigging::RiggingStage;
