//! HTTP tests for the conversion-status webhook.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;
use vodify_core::ConversionStatus;

use common::{build_test_app, expect_json, post_form, post_json, TEST_TOKEN};

const URI: &str = "/api/v1/conversion-status";

#[tokio::test]
async fn missing_token_is_rejected_before_the_state_machine() {
    let t = build_test_app();

    let response = post_json(
        t.app.clone(),
        URI,
        json!({ "eventinstance_id": 11, "status": "started" }),
    )
    .await;

    let body = expect_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(body, json!({ "error": "Token is missing" }));
    assert!(t.store.get(11).is_none());
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let t = build_test_app();

    let response = post_json(
        t.app.clone(),
        URI,
        json!({ "token": "not-it", "eventinstance_id": 11, "status": "started" }),
    )
    .await;

    let body = expect_json(response, StatusCode::FORBIDDEN).await;
    assert_eq!(body, json!({ "error": "Provided token is wrong" }));
    assert!(t.store.get(11).is_none());
}

#[tokio::test]
async fn started_callback_updates_the_record_and_echoes_the_payload() {
    let t = build_test_app();
    let payload = json!({ "token": TEST_TOKEN, "eventinstance_id": 11, "status": "started" });

    let response = post_json(t.app.clone(), URI, payload.clone()).await;

    let body = expect_json(response, StatusCode::OK).await;
    assert_eq!(body, payload);

    let record = t.store.get(11).unwrap();
    assert_eq!(record.status, ConversionStatus::Started);
    assert!(record.video_id.is_none());
}

#[tokio::test]
async fn form_encoded_callbacks_are_accepted() {
    let t = build_test_app();

    let response = post_form(
        t.app.clone(),
        URI,
        &format!("token={TEST_TOKEN}&eventinstance_id=11&status=started"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(t.store.get(11).unwrap().status, ConversionStatus::Started);
}

#[tokio::test]
async fn form_encoded_completed_callback_materializes_the_video() {
    let t = build_test_app();
    let details = serde_json::json!({
        "videoId": "987654321",
        "videoName": "Morning Yoga",
        "hostName": "Jo Doe",
        "duration": 3600,
    });
    let body = format!(
        "token={TEST_TOKEN}&eventinstance_id=11&status=completed&details={}",
        urlencode(&details.to_string())
    );

    let response = post_form(t.app.clone(), URI, &body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let record = t.store.get(11).unwrap();
    assert_eq!(record.status, ConversionStatus::Completed);
    assert!(record.video_id.is_some());

    let created = t.content.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].host_video_id, "987654321");
}

/// Minimal percent-encoding for form values in tests.
fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            other => format!("%{other:02X}"),
        })
        .collect()
}

#[tokio::test]
async fn progress_callback_records_the_details_text() {
    let t = build_test_app();

    let response = post_json(
        t.app.clone(),
        URI,
        json!({
            "token": TEST_TOKEN,
            "eventinstance_id": 11,
            "status": "progress",
            "details": "42% transcoded",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let record = t.store.get(11).unwrap();
    assert_eq!(record.status, ConversionStatus::Progress);
    assert_eq!(record.details, "42% transcoded");
}

fn completed_payload(video_id: &str) -> serde_json::Value {
    json!({
        "token": TEST_TOKEN,
        "eventinstance_id": 11,
        "status": "completed",
        "details": {
            "videoId": video_id,
            "videoName": "Morning Yoga",
            "hostName": "Jo Doe",
            "categories": [3, 7],
            "equipment": [12],
            "level": 4,
            "duration": 3600,
            "videoDate": 1_700_000_000,
        },
    })
}

#[tokio::test]
async fn completed_callback_creates_the_video_and_notifies() {
    let t = build_test_app();

    let response = post_json(t.app.clone(), URI, completed_payload("987654321")).await;

    assert_eq!(response.status(), StatusCode::OK);

    let created = t.content.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].title, "Morning Yoga");
    assert_eq!(created[0].instructor, "Jo Doe");
    assert_eq!(created[0].host_video_id, "987654321");
    assert_eq!(created[0].playback_url, "https://vimeo.com/987654321");
    assert_eq!(created[0].duration_secs, 3600);

    let record = t.store.get(11).unwrap();
    assert_eq!(record.status, ConversionStatus::Completed);
    assert!(record.video_id.is_some());
    assert!(record.details.is_empty());

    assert_eq!(t.notifier.sent.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn completed_without_video_id_is_recorded_as_failure() {
    let t = build_test_app();
    let payload = json!({
        "token": TEST_TOKEN,
        "eventinstance_id": 11,
        "status": "completed",
        "details": { "videoName": "Morning Yoga" },
    });

    let response = post_json(t.app.clone(), URI, payload).await;

    // 200 anyway: the converter delivered, we could not materialize.
    assert_eq!(response.status(), StatusCode::OK);

    let record = t.store.get(11).unwrap();
    assert_eq!(record.status, ConversionStatus::Failure);
    assert!(record.details.contains("Materialization failed"));
    assert!(record.video_id.is_none());
    assert!(t.content.created().is_empty());
    assert_eq!(t.notifier.sent.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn repeated_completed_callback_overwrites_the_video_reference() {
    let t = build_test_app();

    post_json(t.app.clone(), URI, completed_payload("111")).await;
    let first = t.store.get(11).unwrap().video_id.unwrap();

    post_json(t.app.clone(), URI, completed_payload("222")).await;
    let second = t.store.get(11).unwrap().video_id.unwrap();

    assert_ne!(first, second);
    assert_eq!(t.content.created().len(), 2);
    assert_eq!(t.notifier.sent.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn late_progress_does_not_clear_the_video_reference() {
    let t = build_test_app();

    post_json(t.app.clone(), URI, completed_payload("987654321")).await;
    let video_id = t.store.get(11).unwrap().video_id;
    assert!(video_id.is_some());

    let response = post_json(
        t.app.clone(),
        URI,
        json!({
            "token": TEST_TOKEN,
            "eventinstance_id": 11,
            "status": "progress",
            "details": "late duplicate",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let record = t.store.get(11).unwrap();
    assert_eq!(record.status, ConversionStatus::Progress);
    assert_eq!(record.video_id, video_id);
}

#[tokio::test]
async fn unknown_status_is_a_validation_error() {
    let t = build_test_app();

    let response = post_json(
        t.app.clone(),
        URI,
        json!({ "token": TEST_TOKEN, "eventinstance_id": 11, "status": "paused" }),
    )
    .await;

    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "Unknown conversion status: paused");
    assert!(t.store.get(11).is_none());
}

#[tokio::test]
async fn missing_event_instance_id_is_a_validation_error() {
    let t = build_test_app();

    let response = post_json(
        t.app.clone(),
        URI,
        json!({ "token": TEST_TOKEN, "status": "started" }),
    )
    .await;

    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["error"], "eventinstance_id is missing");
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Method, Request};
    use tower::ServiceExt;

    let t = build_test_app();
    let response = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(URI)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = expect_json(response, StatusCode::BAD_REQUEST).await;
    assert!(body["error"].as_str().unwrap().starts_with("Malformed payload"));
}
