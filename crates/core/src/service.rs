//! The conversion-status state machine.

use std::sync::Arc;

use chrono::Utc;

use crate::error::CoreError;
use crate::materializer::{ContentMaterializer, MaterializationError};
use crate::status::ConversionStatus;
use crate::traits::{ConversionStatusRecord, NotificationDispatcher, StatusStore};
use crate::types::DbId;

/// Failure of a status-event application.
///
/// The webhook boundary treats these differently: a store failure is a
/// real processing failure (the upstream sender may retry), while a
/// materialization failure has already been recorded on the status record
/// and the callback is still acknowledged.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Status store error: {0}")]
    Store(#[from] CoreError),

    #[error(transparent)]
    Materialization(#[from] MaterializationError),
}

/// Applies incoming converter callbacks to the per-event status record
/// and orchestrates the side effects of terminal transitions.
pub struct ConversionService {
    store: Arc<dyn StatusStore>,
    materializer: ContentMaterializer,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl ConversionService {
    pub fn new(
        store: Arc<dyn StatusStore>,
        materializer: ContentMaterializer,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            materializer,
            notifier,
        }
    }

    /// Apply one status event for an event instance.
    ///
    /// Transitions are applied unconditionally in arrival order; there is
    /// no sequence check, so a duplicate `completed` re-runs
    /// materialization and overwrites the video reference (re-conversion).
    ///
    /// Each transition is persisted as a single atomic save. On a failed
    /// materialization the record is persisted as `failure` with the error
    /// in `details` and the error is returned to the caller.
    pub async fn handle_status_event(
        &self,
        event_instance_id: DbId,
        status: ConversionStatus,
        details: Option<&serde_json::Value>,
    ) -> Result<ConversionStatusRecord, ConversionError> {
        let mut record = self.store.get_or_create(event_instance_id).await?;
        record.status = status;
        record.changed_at = Utc::now();

        match status {
            ConversionStatus::Requested | ConversionStatus::Started => {
                self.store.save(&record).await?;
            }

            ConversionStatus::Progress | ConversionStatus::Failure => {
                record.details = details.map(details_text).unwrap_or_default();
                self.store.save(&record).await?;
            }

            ConversionStatus::Completed => {
                let video = match self.materializer.materialize(event_instance_id, details).await {
                    Ok(video) => video,
                    Err(e) => {
                        record.status = ConversionStatus::Failure;
                        record.details = format!("Materialization failed: {e}");
                        self.store.save(&record).await?;
                        tracing::error!(
                            event_instance_id,
                            error = %e,
                            "Completed callback could not be materialized",
                        );
                        return Err(e.into());
                    }
                };

                record.video_id = Some(video.id);
                record.details = String::new();
                self.store.save(&record).await?;

                // Best-effort: a lost email never rolls back the transition.
                if let Err(e) = self.notifier.video_published(&video).await {
                    tracing::warn!(
                        event_instance_id,
                        video_id = video.id,
                        error = %e,
                        "Video-published notification failed",
                    );
                }
            }
        }

        tracing::info!(
            event_instance_id,
            status = %record.status,
            "Conversion status updated",
        );

        Ok(record)
    }
}

/// Render the webhook `details` field for storage.
///
/// Progress/failure payloads are usually plain strings ("50%"); anything
/// structured is kept as compact JSON.
fn details_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
