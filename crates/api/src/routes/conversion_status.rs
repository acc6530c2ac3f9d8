//! The conversion-status webhook endpoint.
//!
//! `POST /api/v1/conversion-status` is the callback URL handed to the
//! external converter. Payloads may be JSON or form encoded and are
//! authenticated by a shared token carried in the payload itself.
//!
//! Response policy: HTTP-level failure is reserved for authentication and
//! structural validation. An authenticated, well-formed callback is always
//! acknowledged with 200 and the echoed payload — even when downstream
//! materialization failed — so the converter never retry-storms a poison
//! payload. Business failures land in the status record and the logs.

use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::{json, Value};
use vodify_core::types::DbId;
use vodify_core::{ConversionError, ConversionStatus};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/conversion-status", post(update_status))
}

/// POST /api/v1/conversion-status
async fn update_status(State(state): State<AppState>, req: Request) -> Response {
    let payload = match parse_payload(req).await {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    // Authentication comes before anything touches the state machine.
    match payload.get("token").and_then(Value::as_str) {
        None => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Token is missing" })),
            )
                .into_response();
        }
        Some(token) if token != state.config.webhook_token => {
            tracing::warn!("Webhook rejected: wrong token");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Provided token is wrong" })),
            )
                .into_response();
        }
        Some(_) => {}
    }

    let Some(event_instance_id) = field_id(&payload, "eventinstance_id") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "eventinstance_id is missing" })),
        )
            .into_response();
    };
    let Some(status_name) = payload.get("status").and_then(Value::as_str) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "status is missing" })),
        )
            .into_response();
    };
    let status: ConversionStatus = match status_name.parse() {
        Ok(status) => status,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() })))
                .into_response();
        }
    };

    let result = state
        .service
        .handle_status_event(event_instance_id, status, payload.get("details"))
        .await;

    match result {
        // Acknowledge with the echoed payload. Materialization failures
        // have already been recorded on the status record by the service.
        Ok(_) | Err(ConversionError::Materialization(_)) => {
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(ConversionError::Store(e)) => AppError::Core(e).into_response(),
    }
}

/// Decode the request body into a JSON value, accepting both JSON and
/// form-encoded payloads (the converter sends either depending on the
/// callback type).
async fn parse_payload(req: Request) -> Result<Value, Response> {
    let is_form = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, &())
            .await
            .map_err(|e| malformed(&e.to_string()))?;
        Ok(Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        ))
    } else {
        let Json(value) = Json::<Value>::from_request(req, &())
            .await
            .map_err(|e| malformed(&e.to_string()))?;
        Ok(value)
    }
}

fn malformed(detail: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": format!("Malformed payload: {detail}") })),
    )
        .into_response()
}

/// Read an id field that may arrive as a number or a numeric string.
fn field_id(payload: &Value, key: &str) -> Option<DbId> {
    match payload.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(field_id(&json!({ "id": 11 }), "id"), Some(11));
        assert_eq!(field_id(&json!({ "id": "11" }), "id"), Some(11));
        assert_eq!(field_id(&json!({ "id": " 11 " }), "id"), Some(11));
        assert_eq!(field_id(&json!({ "id": "eleven" }), "id"), None);
        assert_eq!(field_id(&json!({ "id": [11] }), "id"), None);
        assert_eq!(field_id(&json!({}), "id"), None);
    }
}
