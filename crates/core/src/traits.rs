//! Collaborator interfaces for the conversion pipeline.
//!
//! The state machine and the materializer talk to persistence, the video
//! host, and the mailer exclusively through these traits. Production
//! implementations live in `vodify-db` (Postgres), `vodify-vimeo`
//! (thumbnail download), and `vodify-api` (SMTP); tests use in-memory
//! fakes.

use async_trait::async_trait;
use serde::Serialize;

use crate::completion::CompletionDetails;
use crate::error::CoreError;
use crate::status::ConversionStatus;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status store
// ---------------------------------------------------------------------------

/// One conversion-status record per event instance.
///
/// Invariant: `video_id` is set iff `status` is `Completed` and
/// materialization succeeded for that completion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStatusRecord {
    pub id: DbId,
    /// Source live-stream occurrence. At most one record exists per value.
    pub event_instance_id: DbId,
    pub status: ConversionStatus,
    /// Diagnostic/progress payload from the converter; cleared on success.
    pub details: String,
    /// The published video produced by the last successful completion.
    pub video_id: Option<DbId>,
    pub changed_at: Timestamp,
}

/// Persistence for conversion-status records, keyed by event instance.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Fetch the unique record for an event instance, creating it with
    /// status `Requested` if none exists yet. Concurrent first calls for
    /// the same id must yield exactly one persisted record.
    async fn get_or_create(&self, event_instance_id: DbId)
        -> Result<ConversionStatusRecord, CoreError>;

    /// Persist all mutable fields of the record in one atomic write.
    async fn save(&self, record: &ConversionStatusRecord) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// Content store
// ---------------------------------------------------------------------------

/// Everything needed to create the media asset and the video record.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub instructor: String,
    pub category_ids: Vec<DbId>,
    pub equipment_ids: Vec<DbId>,
    pub level_id: Option<DbId>,
    pub duration_secs: i64,
    pub description: String,
    /// External video-host asset id.
    pub host_video_id: String,
    /// Canonical playback URL derived from the asset id.
    pub playback_url: String,
    pub thumbnail_path: Option<String>,
    pub recorded_at: Timestamp,
}

/// A created (still unpublished) video record.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedVideo {
    pub id: DbId,
    pub title: String,
    pub media_asset_id: DbId,
}

/// Creates the downstream media asset plus video record.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create the media asset and the unpublished video record in a single
    /// atomic operation and return the assigned identifiers.
    async fn create_video(&self, video: NewVideo) -> Result<PublishedVideo, CoreError>;
}

// ---------------------------------------------------------------------------
// Event directory
// ---------------------------------------------------------------------------

/// Context of the originating event instance and its series.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub series_title: String,
    pub host_name: String,
    /// Instance description, already falling back to the series one.
    pub description: String,
    pub category_ids: Vec<DbId>,
    pub equipment_ids: Vec<DbId>,
    pub level_id: Option<DbId>,
    /// Live stream URL of the series on the video host.
    pub stream_url: String,
    pub starts_at: Timestamp,
}

/// Read-only lookup of event instances by id.
#[async_trait]
pub trait EventDirectory: Send + Sync {
    async fn find(&self, event_instance_id: DbId) -> Result<Option<EventContext>, CoreError>;
}

// ---------------------------------------------------------------------------
// Thumbnail provider
// ---------------------------------------------------------------------------

/// A thumbnail image stored by the provider.
#[derive(Debug, Clone)]
pub struct StoredThumbnail {
    /// Path (or storage URI) of the stored image file.
    pub path: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Thumbnail fetch failed: {0}")]
    Fetch(String),

    #[error("Thumbnail store failed: {0}")]
    Store(String),
}

/// Produces an image asset from the completion details.
///
/// Failures here never fail the overall pipeline; the video is simply
/// created without a thumbnail.
#[async_trait]
pub trait ThumbnailProvider: Send + Sync {
    async fn prepare_thumbnail(
        &self,
        details: &CompletionDetails,
    ) -> Result<Option<StoredThumbnail>, ThumbnailError>;
}

// ---------------------------------------------------------------------------
// Notification dispatcher
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Sends the "video created" notification to the configured recipients.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn video_published(&self, video: &PublishedVideo) -> Result<(), NotificationError>;
}
