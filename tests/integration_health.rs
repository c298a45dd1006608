#![allow(clippy::unwrap_used, clippy::panic, clippy::todo, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::cast_precision_loss, clippy::clone_on_ref_ptr, clippy::match_same_arms, clippy::items_after_statements, unreachable_pub, clippy::print_stdout, clippy::print_stderr, clippy::similar_names)]
use reqwest::StatusCode;
mod common;

#[tokio::test]
async fn test_livez() {
    let Some(app) = common::TestApp::spawn().await else { return };

    let resp = app.client.get(format!("{}/livez", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readyz_happy_path() {
    let Some(app) = common::TestApp::spawn().await else { return };

    let resp = app.client.get(format!("{}/readyz", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_readyz_database_error() {
    let Some(app) = common::TestApp::spawn().await else { return };

    // Closing the shared pool makes every subsequent check fail.
    app.pool.close().await;

    let resp = app.client.get(format!("{}/readyz", app.mgmt_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["database"], "error");
}

#[tokio::test]
async fn test_openapi_is_served_with_version() {
    let Some(app) = common::TestApp::spawn().await else { return };
    let root = app.server_url.trim_end_matches("/v1");

    let resp = app.client.get(format!("{root}/openapi.yaml")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/yaml");
    let body = resp.text().await.unwrap();
    assert!(body.contains(&format!("version: {}", env!("CARGO_PKG_VERSION"))));
    assert!(body.contains("/conversations/{userId}/messages"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let Some(app) = common::TestApp::spawn().await else { return };

    let generated = app.client.get(app.url("/services")).send().await.unwrap();
    assert!(generated.headers().contains_key("x-request-id"));

    let provided = app.client.get(app.url("/services")).header("x-request-id", "trace-me-123").send().await.unwrap();
    assert_eq!(provided.headers()["x-request-id"], "trace-me-123");
}
