//! Route definitions for the `/avatar/jobs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::avatar;
use crate::state::AppState;

/// Routes mounted at `/avatar/jobs`.
///
/// ```text
/// POST   /               -> create_job
/// GET    /{id}           -> get_job
/// GET    /{id}/assets    -> list_assets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(avatar::create_job))
        .route("/{id}", get(avatar::get_job))
        .route("/{id}/assets", get(avatar::list_assets))
}
