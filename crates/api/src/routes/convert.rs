//! Conversion submission and form-prefill lookups.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use vodify_core::timecode;
use vodify_core::types::DbId;
use vodify_core::{ConversionError, ConversionStatus, CoreError};

use crate::converter::ConversionJob;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/convert", post(submit))
        .route("/convert/{eventinstance_id}/prefill", get(prefill))
}

/// Request body for a conversion submission.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub eventinstance_id: DbId,
    /// Asset id of the raw recording on the video host.
    pub vimeo_video_id: String,
    /// Cut-in point, `HH:MM:SS`.
    pub begin_time: String,
    /// Cut-out point, `HH:MM:SS`; must be after `begin_time`.
    pub end_time: String,
    pub video_name: String,
    pub host_name: String,
    #[serde(default)]
    pub categories: Vec<DbId>,
    #[serde(default)]
    pub equipment: Vec<DbId>,
    #[serde(default)]
    pub level: Option<DbId>,
}

/// POST /api/v1/convert
///
/// Submit a conversion job for an event instance, then mark its status
/// record `requested`.
async fn submit(
    State(state): State<AppState>,
    Json(input): Json<ConvertRequest>,
) -> AppResult<impl IntoResponse> {
    if input.vimeo_video_id.trim().is_empty() {
        return Err(AppError::BadRequest("vimeo_video_id must not be empty".into()));
    }
    if input.video_name.trim().is_empty() {
        return Err(AppError::BadRequest("video_name must not be empty".into()));
    }

    let (start, duration) = timecode::clip_duration(&input.begin_time, &input.end_time)?;

    let config = &state.config;
    let job = ConversionJob {
        callback_url: format!(
            "{}/api/v1/conversion-status",
            config.public_base_url.trim_end_matches('/')
        ),
        event_instance_id: input.eventinstance_id,
        video_id: input.vimeo_video_id.trim().to_string(),
        start: start as i64,
        duration: duration as i64,
        video_name: input.video_name,
        host_name: input.host_name,
        categories: input.categories,
        equipment: input.equipment,
        level: input.level,
        preroll_video_id: config.preroll_video_id.clone(),
        postroll_video_id: config.postroll_video_id.clone(),
    };

    state
        .submitter
        .submit(&job)
        .await
        .map_err(|e| AppError::Unavailable(format!("Converter submission failed: {e}")))?;

    state
        .service
        .handle_status_event(input.eventinstance_id, ConversionStatus::Requested, None)
        .await
        .map_err(|e| match e {
            ConversionError::Store(core) => AppError::Core(core),
            other => AppError::Internal(other.to_string()),
        })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "eventinstance_id": input.eventinstance_id,
            "status": ConversionStatus::Requested,
        })),
    ))
}

/// GET /api/v1/convert/{eventinstance_id}/prefill
///
/// Suggested form values for an event instance: series metadata plus, when
/// the video host is configured, the located raw recording.
async fn prefill(
    State(state): State<AppState>,
    Path(event_instance_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let context = state
        .events
        .find(event_instance_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EventInstance",
            id: event_instance_id,
        }))?;

    let video = match &state.vimeo {
        Some(vimeo) => {
            vimeo
                .find_event_video(&context.stream_url, context.starts_at)
                .await
        }
        None => None,
    };

    Ok(Json(json!({
        "eventinstance_id": event_instance_id,
        "vimeo_video_id": video.as_ref().map(|v| v.video_id().to_string()),
        "video_name": context.series_title,
        "host_name": context.host_name,
        "categories": context.category_ids,
        "equipment": context.equipment_ids,
        "level": context.level_id,
    })))
}
