//! Shared helpers for API integration tests.
//!
//! Builds the application router over the in-memory job store, so the
//! full HTTP surface and the background queue run without a database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use persona_api::config::ServerConfig;
use persona_api::router::build_app_router;
use persona_api::state::AppState;
use persona_core::config::Settings;
use persona_pipeline::store::MemoryJobStore;
use persona_pipeline::PipelineRunner;
use persona_worker::TaskQueue;
use tempfile::TempDir;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
    }
}

/// Build the application router backed by an in-memory store.
///
/// Returns the router, the store for direct assertions, and the
/// storage root that must outlive the test.
pub fn build_test_app() -> (Router, Arc<MemoryJobStore>, TempDir) {
    let root = TempDir::new().expect("temp dir");
    let settings = Settings {
        database_url: String::new(),
        temp_storage_path: root.path().join("tmp"),
        output_path: root.path().join("out"),
        asset_base_url: "http://assets.test".to_string(),
        deca_model_path: root.path().join("models/deca"),
        gpu_enabled: false,
        worker_count: 2,
    };

    let store = Arc::new(MemoryJobStore::new());
    let runner = Arc::new(PipelineRunner::with_default_stages(
        store.clone(),
        settings,
    ));
    let queue = TaskQueue::new(runner, 2);

    let config = test_config();
    let state = AppState {
        store: store.clone(),
        queue,
        pool: None,
        config: Arc::new(config.clone()),
    };

    (build_app_router(state, &config), store, root)
}

/// Issue a GET request against the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Issue a POST request with a JSON body against the router.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("valid JSON body")
}

/// Assert status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
