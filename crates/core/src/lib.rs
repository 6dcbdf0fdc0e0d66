//! Domain layer for the avatar generation pipeline.
//!
//! Pure types and functions with no internal dependencies: id and
//! timestamp aliases, configuration, photo validation rules, the
//! intermediate artifact types, and the pipeline context threaded
//! through stage execution.

pub mod artifacts;
pub mod config;
pub mod context;
pub mod error;
pub mod photos;
pub mod types;
