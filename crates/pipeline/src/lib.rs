//! Avatar pipeline execution engine.
//!
//! Turns a persisted job into distributable avatar assets by running
//! five stages in fixed order (ingestion, preprocessing, reconstruction,
//! rigging, packaging) against a shared [`PipelineContext`]
//! (persona_core::context::PipelineContext), persisting a status
//! transition after every stage through an injectable [`JobStore`]
//! (store::JobStore).

pub mod capabilities;
pub mod error;
pub mod runner;
pub mod stage;
pub mod stages;
pub mod store;
pub mod writers;

pub use error::PipelineError;
pub use runner::PipelineRunner;
pub use stage::PipelineStage;
pub use store::JobStore;
