//! Read-only client for the Vimeo oEmbed and videos APIs.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Default timeout for all Vimeo API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// App name Vimeo reports for live-stream archive videos.
const LIVE_APP_NAME: &str = "Vimeo Live";

/// Errors from the Vimeo API layer.
#[derive(Debug, thiserror::Error)]
pub enum VimeoError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Vimeo returned a non-2xx status code.
    #[error("Vimeo API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The authenticated search API was called without an access token.
    #[error("Vimeo access token is not configured")]
    Unconfigured,
}

/// oEmbed metadata for a single video.
#[derive(Debug, Clone, Deserialize)]
pub struct OembedData {
    pub title: String,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_id: Option<i64>,
}

/// One item from a `/me/videos` search response.
#[derive(Debug, Clone, Deserialize)]
pub struct VimeoVideo {
    /// API URI of the form `/videos/{id}`.
    pub uri: String,
    pub name: String,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub app: Option<VimeoApp>,
}

/// The app that produced a video (live events report "Vimeo Live").
#[derive(Debug, Clone, Deserialize)]
pub struct VimeoApp {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<VimeoVideo>,
}

impl VimeoVideo {
    /// The bare video id, stripped of the `/videos/` URI prefix.
    pub fn video_id(&self) -> &str {
        self.uri.trim_start_matches("/videos/")
    }
}

/// HTTP client for the Vimeo lookup APIs.
///
/// oEmbed lookups need no credentials; the search API requires a bearer
/// token. Lookup helpers return `Option` — an unreachable host or an
/// unknown video is "no data", not an exceptional condition.
pub struct VimeoClient {
    client: reqwest::Client,
    api_url: String,
    oembed_url: String,
    access_token: Option<String>,
}

impl VimeoClient {
    pub fn new(access_token: Option<String>) -> Self {
        Self::with_urls(
            access_token,
            "https://api.vimeo.com".to_string(),
            "https://vimeo.com/api/oembed.json".to_string(),
        )
    }

    /// Create a client against non-default endpoints (tests).
    pub fn with_urls(access_token: Option<String>, api_url: String, oembed_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build Vimeo HTTP client");
        Self {
            client,
            api_url,
            oembed_url,
            access_token,
        }
    }

    /// Fetch oEmbed metadata for a video URL.
    ///
    /// Transport failures and non-2xx responses are logged and mapped to
    /// `None`, so callers branch on data availability instead of catching
    /// errors.
    pub async fn oembed(&self, video_url: &str) -> Option<OembedData> {
        let result = self
            .client
            .get(&self.oembed_url)
            .query(&[("url", video_url)])
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(video_url, error = %e, "oEmbed request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(video_url, status = %response.status(), "oEmbed lookup rejected");
            return None;
        }

        match response.json::<OembedData>().await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(video_url, error = %e, "oEmbed response was not decodable");
                None
            }
        }
    }

    /// Search the authenticated account's videos by title, newest first.
    pub async fn search_videos(&self, query: &str) -> Result<Vec<VimeoVideo>, VimeoError> {
        let token = self.access_token.as_deref().ok_or(VimeoError::Unconfigured)?;

        let response = self
            .client
            .get(format!("{}/me/videos", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("query", query),
                ("per_page", "100"),
                ("sort", "date"),
                ("direction", "desc"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VimeoError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<SearchResponse>().await?.data)
    }

    /// Locate the archived recording of an event occurrence.
    ///
    /// Uses the event's stream URL to learn its title, searches the
    /// account's videos for that title, and picks the newest "Vimeo Live"
    /// item created at or before `before`. Vimeo creates the video for the
    /// next occurrence as soon as the previous one ends, so items newer
    /// than the occurrence date belong to a later class.
    pub async fn find_event_video(
        &self,
        event_url: &str,
        before: DateTime<Utc>,
    ) -> Option<VimeoVideo> {
        if event_url.is_empty() {
            return None;
        }
        let event_data = self.oembed(event_url).await?;

        let items = match self.search_videos(&event_data.title).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(event_url, error = %e, "Vimeo video search failed");
                return None;
            }
        };

        pick_event_video(items, before)
    }
}

/// Pick the newest live-archive video created at or before `before`.
///
/// Assumes `items` is sorted newest first, as returned by the search API.
fn pick_event_video(items: Vec<VimeoVideo>, before: DateTime<Utc>) -> Option<VimeoVideo> {
    items.into_iter().find(|item| {
        let is_live = item
            .app
            .as_ref()
            .is_some_and(|app| app.name == LIVE_APP_NAME);
        is_live && item.created_time <= before
    })
}
