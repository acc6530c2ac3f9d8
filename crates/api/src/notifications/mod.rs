//! Outbound "video created" notifications.

pub mod email;

use async_trait::async_trait;
use vodify_core::traits::{NotificationDispatcher, NotificationError, PublishedVideo};

pub use email::{EmailNotifier, SmtpConfig};

/// Dispatcher used when SMTP is not configured: logs and succeeds.
pub struct NullDispatcher;

#[async_trait]
impl NotificationDispatcher for NullDispatcher {
    async fn video_published(&self, video: &PublishedVideo) -> Result<(), NotificationError> {
        tracing::info!(
            video_id = video.id,
            title = %video.title,
            "Notification skipped, SMTP is not configured",
        );
        Ok(())
    }
}
