//! Thumbnail download and storage.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use vodify_core::traits::{StoredThumbnail, ThumbnailError, ThumbnailProvider};
use vodify_core::CompletionDetails;

/// Default timeout for a thumbnail download.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Preference order for thumbnail formats.
const ACCEPT_IMAGE: &str = "image/jpeg;q=0.9,image/png;q=0.1";

/// Downloads the completion thumbnail and stores it on local disk.
///
/// Everything here is best-effort from the pipeline's point of view: a
/// missing URL, a slow CDN, or a full disk all surface as "no thumbnail",
/// never as a failed conversion.
pub struct ThumbnailFetcher {
    client: reqwest::Client,
    directory: PathBuf,
}

impl ThumbnailFetcher {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to build thumbnail HTTP client");
        Self {
            client,
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl ThumbnailProvider for ThumbnailFetcher {
    async fn prepare_thumbnail(
        &self,
        details: &CompletionDetails,
    ) -> Result<Option<StoredThumbnail>, ThumbnailError> {
        let url = match details.thumbnail_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => return Ok(None),
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_IMAGE)
            .send()
            .await
            .map_err(|e| ThumbnailError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThumbnailError::Fetch(format!(
                "thumbnail source answered {status}"
            )));
        }

        let extension = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(extension_for)
            .unwrap_or("jpg");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ThumbnailError::Fetch(e.to_string()))?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| ThumbnailError::Store(e.to_string()))?;

        let filename = format!(
            "{}.{extension}",
            build_filename(&details.video_name, &details.host_name)
        );
        let path = self.directory.join(filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ThumbnailError::Store(e.to_string()))?;

        tracing::info!(path = %path.display(), "Thumbnail stored");

        Ok(Some(StoredThumbnail {
            path: path.to_string_lossy().into_owned(),
        }))
    }
}

/// Map a Content-Type header to a file extension, defaulting to jpg.
fn extension_for(content_type: &str) -> &'static str {
    if content_type.starts_with("image/png") {
        "png"
    } else {
        "jpg"
    }
}

/// Build the stored filename: `{video-name}-with-{host-name}`, with
/// spaces and dots replaced by dashes.
fn build_filename(video_name: &str, host_name: &str) -> String {
    [video_name, "with", host_name]
        .join("-")
        .replace([' ', '.'], "-")
}
