//! Generated asset entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use persona_core::types::Timestamp;

/// A row from the `avatar_assets` table.
///
/// Assets belong to exactly one job, are created only after every
/// pipeline stage succeeded, and are immutable thereafter.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GeneratedAsset {
    pub id: Uuid,
    pub job_id: Uuid,
    /// Writer-defined format tag, e.g. `GLB` or `FBX`.
    pub asset_type: String,
    /// Public location of the asset file.
    pub uri: String,
    /// Free-form writer metadata (provenance paths, checksum, engine info).
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}
