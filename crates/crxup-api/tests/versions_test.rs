//! Version listing and artifact hosting integration tests.
//!
//! Run with: `cargo test -p crxup-api --test versions_test`

mod helpers;

use axum::http::StatusCode;
use crxup_core::VersionListing;
use helpers::{setup_test_app, setup_test_app_with, TEST_BASE_URL};

#[tokio::test]
async fn test_versions_empty_directory() {
    let app = setup_test_app().await;

    let response = app.client().get("/pp-ext/versions").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let listing: VersionListing = response.json();
    assert_eq!(listing.extension, "pp-extension");
    assert!(listing.versions.is_empty());
}

#[tokio::test]
async fn test_versions_sorted_newest_first() {
    let app = setup_test_app().await;
    app.put_archive("crx-pp-extension-1.0.0.zip");
    app.put_archive("crx-pp-extension-2.1.0.zip");
    app.put_archive("crx-pp-extension-2.0.9.zip");
    app.put_archive("crx-pp-extension-10.0.0.zip");
    app.put_archive("notes.txt");

    let listing: VersionListing = app.client().get("/pp-ext/versions").await.json();

    let versions: Vec<&str> = listing.versions.iter().map(|v| v.version.as_str()).collect();
    assert_eq!(versions, vec!["10.0.0", "2.1.0", "2.0.9", "1.0.0"]);
    assert_eq!(
        listing.versions[1].url,
        format!("{}/pp-ext/crx-pp-extension-2.1.0.zip", TEST_BASE_URL)
    );
    assert_eq!(listing.versions[1].filename, "crx-pp-extension-2.1.0.zip");
}

#[tokio::test]
async fn test_versions_missing_directory_in_static_profile() {
    let app = setup_test_app_with(&[("DEPLOYMENT_PROFILE", "static")]).await;
    assert!(!app.storage_dir().exists());

    let response = app.client().get("/pp-ext/versions").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let listing: VersionListing = response.json();
    assert!(listing.versions.is_empty());
}

#[tokio::test]
async fn test_download_artifact_bytes() {
    let app = setup_test_app().await;
    app.put_archive("crx-pp-extension-1.2.3.zip");

    let response = app.client().get("/pp-ext/crx-pp-extension-1.2.3.zip").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "application/zip");
    assert_eq!(
        response.as_bytes().as_ref(),
        helpers::fixtures::archive_bytes("crx-pp-extension-1.2.3.zip").as_slice()
    );
}

#[tokio::test]
async fn test_download_missing_artifact_is_404() {
    let app = setup_test_app().await;

    let response = app.client().get("/pp-ext/crx-pp-extension-9.9.9.zip").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_archive_names_are_served() {
    let app = setup_test_app().await;
    app.put_archive("notes.txt");

    let response = app.client().get("/pp-ext/notes.txt").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.client().get("/pp-ext/..%2F..%2Fetc%2Fpasswd").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_route_prefix() {
    let app = setup_test_app_with(&[("ROUTE_PREFIX", "updates/chrome/")]).await;
    app.put_archive("crx-pp-extension-1.0.0.zip");

    let listing: VersionListing = app.client().get("/updates/chrome/versions").await.json();
    assert_eq!(
        listing.versions[0].url,
        format!("{}/updates/chrome/crx-pp-extension-1.0.0.zip", TEST_BASE_URL)
    );

    let response = app.client().get("/pp-ext/versions").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let app = setup_test_app().await;

    let response = app.client().delete("/pp-ext/versions").await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app.client().get("/pp-ext/upload").await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .method(axum::http::Method::OPTIONS, "/pp-ext/versions")
        .add_header("Origin", "https://example.org")
        .add_header("Access-Control-Request-Method", "GET")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let app = setup_test_app().await;

    let response = app.client().get("/pp-ext/versions").await;

    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert!(response.maybe_header("x-request-id").is_some());
}
