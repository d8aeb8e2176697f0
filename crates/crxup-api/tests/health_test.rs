//! Health and docs integration tests.
//!
//! Run with: `cargo test -p crxup-api --test health_test`

mod helpers;

use axum::http::StatusCode;
use helpers::{setup_test_app, setup_test_app_with};
use serde_json::Value;

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    for path in ["/health", "/api/health"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{path}");
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "Update server is running");
    }
}

#[tokio::test]
async fn test_readiness_with_storage() {
    let app = setup_test_app().await;

    let response = app.client().get("/health/ready").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "ready");
}

#[tokio::test]
async fn test_readiness_without_storage_directory() {
    let app = setup_test_app_with(&[("DEPLOYMENT_PROFILE", "static")]).await;

    let response = app.client().get("/health/ready").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["status"], "not_ready");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = setup_test_app().await;

    let response = app.client().get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let spec: Value = response.json();
    assert!(spec["paths"]["/pp-ext/update.xml"].is_object());
    assert!(spec["paths"]["/pp-ext/upload"].is_object());
}

#[tokio::test]
async fn test_docs_page() {
    let app = setup_test_app().await;

    let response = app.client().get("/docs").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("rapi-doc"));
}
