pub mod avatar;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /avatar/jobs                POST   create and enqueue a job
/// /avatar/jobs/{id}           GET    job status and progress
/// /avatar/jobs/{id}/assets    GET    generated assets
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/avatar/jobs", avatar::router())
}
