//! Materialization of completion details into persisted content.

use std::sync::Arc;

use crate::completion::CompletionDetails;
use crate::error::CoreError;
use crate::traits::{ContentStore, EventDirectory, NewVideo, PublishedVideo, ThumbnailProvider};
use crate::types::DbId;

/// Why a `completed` callback could not be turned into content.
///
/// Any of these downgrades the status record to `Failure` — the record
/// must never claim `Completed` without a video reference.
#[derive(Debug, thiserror::Error)]
pub enum MaterializationError {
    #[error("Completion details missing from payload")]
    MissingDetails,

    #[error("Invalid completion details: {0}")]
    Invalid(String),

    #[error("Content creation failed: {0}")]
    Content(#[from] CoreError),
}

/// Builds the media asset and the unpublished video record for a
/// completed conversion.
///
/// Thumbnail preparation and the event-context lookup are best-effort:
/// either can fail (or come back empty) without failing materialization.
pub struct ContentMaterializer {
    content: Arc<dyn ContentStore>,
    events: Arc<dyn EventDirectory>,
    thumbnails: Arc<dyn ThumbnailProvider>,
}

impl ContentMaterializer {
    pub fn new(
        content: Arc<dyn ContentStore>,
        events: Arc<dyn EventDirectory>,
        thumbnails: Arc<dyn ThumbnailProvider>,
    ) -> Self {
        Self {
            content,
            events,
            thumbnails,
        }
    }

    /// Materialize the payload of a `completed` callback.
    pub async fn materialize(
        &self,
        event_instance_id: DbId,
        details: Option<&serde_json::Value>,
    ) -> Result<PublishedVideo, MaterializationError> {
        let details = details.ok_or(MaterializationError::MissingDetails)?;
        // Form-encoded callbacks deliver the details object as a JSON
        // string field; JSON callbacks deliver it as a nested object.
        let details: CompletionDetails = match details {
            serde_json::Value::String(raw) => serde_json::from_str(raw),
            other => serde_json::from_value(other.clone()),
        }
        .map_err(|e| MaterializationError::Invalid(e.to_string()))?;
        details
            .validate()
            .map_err(|e| MaterializationError::Invalid(e.to_string()))?;

        let context = match self.events.find(event_instance_id).await {
            Ok(context) => context.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    event_instance_id,
                    error = %e,
                    "Event instance lookup failed, materializing without context",
                );
                Default::default()
            }
        };

        let thumbnail = match self.thumbnails.prepare_thumbnail(&details).await {
            Ok(thumbnail) => thumbnail,
            Err(e) => {
                tracing::warn!(
                    event_instance_id,
                    video_id = %details.video_id,
                    error = %e,
                    "Thumbnail preparation failed, continuing without thumbnail",
                );
                None
            }
        };

        let video = self
            .content
            .create_video(NewVideo {
                title: details.video_name.clone(),
                instructor: details.host_name.clone(),
                category_ids: details.categories.clone(),
                equipment_ids: details.equipment.clone(),
                level_id: details.level,
                duration_secs: details.duration,
                description: context.description,
                host_video_id: details.video_id.trim().to_string(),
                playback_url: details.playback_url(),
                thumbnail_path: thumbnail.map(|t| t.path),
                recorded_at: details.recorded_at(),
            })
            .await?;

        tracing::info!(
            event_instance_id,
            video_id = video.id,
            media_asset_id = video.media_asset_id,
            "Video record materialized",
        );

        Ok(video)
    }
}
