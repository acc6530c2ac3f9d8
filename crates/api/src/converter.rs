//! Job submission to the external conversion service.
//!
//! The converter accepts a form-encoded POST describing the clip to cut
//! and the callback URL it should report status to.

use std::time::Duration;

use async_trait::async_trait;
use vodify_core::types::DbId;

/// Timeout for the job submission request.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the converter submission layer.
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The converter answered with a non-2xx status code.
    #[error("Converter error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// A conversion job to submit: cut the clip `[start, start + duration)`
/// out of the raw recording and publish the result through the webhook.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    /// Absolute URL the converter reports status callbacks to.
    pub callback_url: String,
    pub event_instance_id: DbId,
    /// Video-host asset id of the raw recording.
    pub video_id: String,
    /// Start offset in seconds.
    pub start: i64,
    /// Clip duration in seconds.
    pub duration: i64,
    pub video_name: String,
    pub host_name: String,
    pub categories: Vec<DbId>,
    pub equipment: Vec<DbId>,
    pub level: Option<DbId>,
    pub preroll_video_id: Option<String>,
    pub postroll_video_id: Option<String>,
}

/// Submits conversion jobs to the external processing service.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, job: &ConversionJob) -> Result<(), ConverterError>;
}

/// HTTP client for the conversion service.
pub struct ConverterClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ConverterClient {
    pub fn new(endpoint: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()
            .expect("Failed to build converter HTTP client");
        Self { client, endpoint }
    }
}

#[async_trait]
impl JobSubmitter for ConverterClient {
    async fn submit(&self, job: &ConversionJob) -> Result<(), ConverterError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&form_fields(job))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConverterError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        tracing::info!(
            event_instance_id = job.event_instance_id,
            video_id = %job.video_id,
            start = job.start,
            duration = job.duration,
            "Conversion job submitted",
        );
        Ok(())
    }
}

/// Encode the job as the converter's form fields.
///
/// Taxonomy id lists go over the wire as JSON-encoded integer arrays.
pub fn form_fields(job: &ConversionJob) -> Vec<(&'static str, String)> {
    vec![
        ("CALLBACK_URL", job.callback_url.clone()),
        ("EVENT_INSTANCE_ID", job.event_instance_id.to_string()),
        ("VIMEO_VIDEO_ID", job.video_id.clone()),
        ("START", job.start.to_string()),
        ("DURATION", job.duration.to_string()),
        ("VIDEO_NAME", job.video_name.clone()),
        ("VY_HOST_NAME", job.host_name.clone()),
        ("VY_CATEGORIES", serde_json::json!(job.categories).to_string()),
        ("VY_EQUIPMENT", serde_json::json!(job.equipment).to_string()),
        (
            "VY_LEVEL",
            job.level.map(|id| id.to_string()).unwrap_or_default(),
        ),
        (
            "PREROLL_VIMEO_VIDEO_ID",
            job.preroll_video_id.clone().unwrap_or_default(),
        ),
        (
            "POSTROLL_VIMEO_VIDEO_ID",
            job.postroll_video_id.clone().unwrap_or_default(),
        ),
    ]
}
