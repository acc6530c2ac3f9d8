//! Email notification delivery via SMTP.
//!
//! [`EmailNotifier`] wraps the `lettre` async SMTP transport to tell staff
//! that a video record was created and is waiting for review. If
//! `SMTP_HOST` is not set, [`SmtpConfig::from_env`] returns `None` and the
//! null dispatcher is wired in instead.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use vodify_core::traits::{NotificationDispatcher, NotificationError, PublishedVideo};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@vodify.local";

/// SMTP transport configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_address: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            user: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends the "video created" email to the configured recipients.
pub struct EmailNotifier {
    config: SmtpConfig,
    recipients: Vec<String>,
    template: String,
    base_url: String,
}

impl EmailNotifier {
    pub fn new(
        config: SmtpConfig,
        recipients: Vec<String>,
        template: String,
        base_url: String,
    ) -> Self {
        Self {
            config,
            recipients,
            template,
            base_url,
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .map_err(|e| NotificationError::Delivery(e.to_string()))?
            .port(self.config.port);

        if let (Some(user), Some(pass)) = (&self.config.user, &self.config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl NotificationDispatcher for EmailNotifier {
    async fn video_published(&self, video: &PublishedVideo) -> Result<(), NotificationError> {
        if self.recipients.is_empty() {
            tracing::debug!(video_id = video.id, "No notification recipients configured");
            return Ok(());
        }

        let edit_url = edit_url(&self.base_url, video.id);
        let subject = format!("New video created: {}", video.title);
        let body = render_template(&self.template, &video.title, &edit_url);
        let mailer = self.transport()?;

        for recipient in &self.recipients {
            let email = Message::builder()
                .from(
                    self.config
                        .from_address
                        .parse()
                        .map_err(|e| NotificationError::Delivery(format!("from address: {e}")))?,
                )
                .to(recipient
                    .parse()
                    .map_err(|e| NotificationError::Delivery(format!("recipient: {e}")))?)
                .subject(&subject)
                .header(ContentType::TEXT_PLAIN)
                .body(body.clone())
                .map_err(|e| NotificationError::Delivery(e.to_string()))?;

            mailer
                .send(email)
                .await
                .map_err(|e| NotificationError::Delivery(e.to_string()))?;

            tracing::info!(to = %recipient, video_id = video.id, "Notification email sent");
        }

        Ok(())
    }
}

/// Edit-form URL of a created video.
fn edit_url(base_url: &str, video_id: i64) -> String {
    format!("{}/videos/{video_id}/edit", base_url.trim_end_matches('/'))
}

/// Substitute the `{name}` and `{edit_url}` placeholders.
fn render_template(template: &str, name: &str, edit_url: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{edit_url}", edit_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_placeholders_are_substituted() {
        let body = render_template(
            "Video {name} is ready: {edit_url}",
            "Morning Yoga",
            "http://localhost:3000/videos/7/edit",
        );
        assert_eq!(
            body,
            "Video Morning Yoga is ready: http://localhost:3000/videos/7/edit"
        );
    }

    #[test]
    fn template_without_placeholders_is_left_alone() {
        assert_eq!(render_template("fixed text", "x", "y"), "fixed text");
    }

    #[test]
    fn edit_url_trims_trailing_slash() {
        assert_eq!(
            edit_url("http://localhost:3000/", 7),
            "http://localhost:3000/videos/7/edit"
        );
    }
}
