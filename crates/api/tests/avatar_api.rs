//! Integration tests for the `/api/v1/avatar/jobs` resource.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{expect_json, get, post_json};
use persona_db::models::status::JobStatus;
use persona_pipeline::store::MemoryJobStore;
use persona_pipeline::JobStore;
use serde_json::json;
use uuid::Uuid;

fn valid_request() -> serde_json::Value {
    json!({
        "user_id": "user-123",
        "photos": [
            {"url": "https://cdn.test/front.jpg", "width": 1024, "height": 1024},
            {"url": "https://cdn.test/side.png", "width": 512, "height": 512},
        ]
    })
}

/// Poll the store until the job reaches a terminal status.
async fn wait_for_terminal(store: &MemoryJobStore, job_id: Uuid) -> JobStatus {
    for _ in 0..400 {
        if let Some(job) = store.get_job(job_id).await.unwrap() {
            if job.status().is_terminal() {
                return job.status();
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {job_id} never reached a terminal status");
}

// ---------------------------------------------------------------------------
// Test: create, execute, and read back a job with its assets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_job_runs_to_success_with_assets() {
    let (app, store, _root) = common::build_test_app();

    let response = post_json(app.clone(), "/api/v1/avatar/jobs", valid_request()).await;
    let body = expect_json(response, StatusCode::CREATED).await;

    let data = &body["data"];
    assert_eq!(data["status"], "PENDING");
    assert_eq!(data["queue_state"], "PENDING");
    assert_eq!(data["progress"], 0.0);
    assert_eq!(data["user_id"], "user-123");
    let job_id: Uuid = data["id"].as_str().unwrap().parse().unwrap();

    let status = wait_for_terminal(&store, job_id).await;
    assert_eq!(status, JobStatus::Success);

    let response = get(app.clone(), &format!("/api/v1/avatar/jobs/{job_id}")).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "SUCCESS");
    assert_eq!(body["data"]["progress"], 1.0);
    assert_eq!(body["data"]["error_message"], serde_json::Value::Null);
    assert!(body["data"]["output_payload"]["assets"].is_object());

    let response = get(app, &format!("/api/v1/avatar/jobs/{job_id}/assets")).await;
    let body = expect_json(response, StatusCode::OK).await;
    let assets = body["data"].as_array().unwrap();
    assert_eq!(assets.len(), 2);
    for asset in assets {
        assert!(asset["uri"]
            .as_str()
            .unwrap()
            .starts_with("http://assets.test/"));
        assert!(asset["metadata"]["checksum_sha256"].is_string());
    }
}

// ---------------------------------------------------------------------------
// Test: invalid photos are rejected but the job row is kept PENDING
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_photos_return_400_and_leave_job_pending() {
    let (app, store, _root) = common::build_test_app();

    let request = json!({
        "user_id": "user-123",
        "photos": [
            {"url": "https://cdn.test/tiny.jpg", "width": 100, "height": 100},
        ]
    });
    let response = post_json(app, "/api/v1/avatar/jobs", request).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;

    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("below the minimum resolution"));

    // The record was persisted before validation and never enqueued.
    let jobs = store.jobs().await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].status(), JobStatus::Pending);
    assert_eq!(jobs[0].progress, 0.0);
}

#[tokio::test]
async fn unsupported_format_is_rejected() {
    let (app, _store, _root) = common::build_test_app();

    let request = json!({
        "user_id": "user-123",
        "photos": [
            {"url": "https://cdn.test/photo.gif", "width": 1024, "height": 1024},
        ]
    });
    let response = post_json(app, "/api/v1/avatar/jobs", request).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;

    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("Unsupported image format"));
}

#[tokio::test]
async fn empty_user_id_is_rejected_without_creating_a_job() {
    let (app, store, _root) = common::build_test_app();

    let request = json!({ "user_id": "  ", "photos": [] });
    let response = post_json(app, "/api/v1/avatar/jobs", request).await;
    let body = expect_json(response, StatusCode::BAD_REQUEST).await;

    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(store.jobs().await.is_empty());
}

// ---------------------------------------------------------------------------
// Test: lookups for unknown jobs return 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_returns_404() {
    let (app, _store, _root) = common::build_test_app();
    let missing = Uuid::new_v4();

    let response = get(app.clone(), &format!("/api/v1/avatar/jobs/{missing}")).await;
    let body = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["code"], "NOT_FOUND");

    let response = get(app, &format!("/api/v1/avatar/jobs/{missing}/assets")).await;
    let body = expect_json(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: a failed run surfaces its error message over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_job_exposes_error_and_no_assets() {
    let (app, store, _root) = common::build_test_app();

    // Seed a failed run directly in the store; the HTTP surface only
    // reads it back.
    let job = store
        .create_job("user-123", json!({"photos": []}))
        .await
        .unwrap();
    store
        .mark_failure(job.id, "Stage ingestion failed: Validation failed")
        .await
        .unwrap();

    let response = get(app.clone(), &format!("/api/v1/avatar/jobs/{}", job.id)).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "FAILED");
    assert_eq!(body["data"]["queue_state"], "IDLE");
    assert!(body["data"]["error_message"]
        .as_str()
        .unwrap()
        .contains("ingestion"));

    let response = get(app, &format!("/api/v1/avatar/jobs/{}/assets", job.id)).await;
    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
