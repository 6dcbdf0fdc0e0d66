//! Row models and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row plus the DTOs needed to create one.

pub mod asset;
pub mod job;
pub mod status;
