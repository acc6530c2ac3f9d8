mod common;

use axum::http::StatusCode;

use common::{build_test_app, expect_json, get};

#[tokio::test]
async fn health_reports_ok_and_version() {
    let t = build_test_app();

    let response = get(t.app.clone(), "/health").await;
    assert!(response.headers().contains_key("x-request-id"));

    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let t = build_test_app();

    let response = get(t.app.clone(), "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
