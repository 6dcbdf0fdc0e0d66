use std::sync::Arc;

use persona_pipeline::JobStore;
use persona_worker::TaskQueue;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    /// Job persistence. Postgres in production, in-memory in tests.
    pub store: Arc<dyn JobStore>,
    /// Bounded background executor for submitted jobs.
    pub queue: TaskQueue,
    /// Database pool for liveness probes. `None` when the store is not
    /// Postgres-backed.
    pub pool: Option<persona_db::DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
