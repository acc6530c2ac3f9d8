/// Server configuration loaded from environment variables.
///
/// `WEBHOOK_TOKEN` and `CONVERTER_URL` are required; everything else has a
/// default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Absolute base URL of this server, used to build the webhook
    /// callback URL handed to the converter and the edit links in
    /// notification emails.
    pub public_base_url: String,
    /// Shared secret the converter must echo in every webhook payload.
    pub webhook_token: String,
    /// Job submission endpoint of the external conversion service.
    pub converter_url: String,
    /// Video-host asset id spliced in before the clip.
    pub preroll_video_id: Option<String>,
    /// Video-host asset id spliced in after the clip.
    pub postroll_video_id: Option<String>,
    /// Recipients of the "video created" notification.
    pub notification_recipients: Vec<String>,
    /// Notification body template with `{name}` / `{edit_url}` placeholders.
    pub notification_template: String,
    /// Directory thumbnails are stored under.
    pub thumbnail_dir: String,
    /// Bearer token for the video host's search API (prefill lookups).
    pub vimeo_access_token: Option<String>,
}

/// Default notification body when `NOTIFICATION_TEMPLATE` is not set.
const DEFAULT_TEMPLATE: &str =
    "A new video \"{name}\" has been created from a live-stream recording. \
     Review and publish it at {edit_url}";

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Required | Default                  |
    /// |-------------------------|----------|--------------------------|
    /// | `HOST`                  | no       | `0.0.0.0`                |
    /// | `PORT`                  | no       | `3000`                   |
    /// | `REQUEST_TIMEOUT_SECS`  | no       | `30`                     |
    /// | `PUBLIC_BASE_URL`       | no       | `http://localhost:3000`  |
    /// | `WEBHOOK_TOKEN`         | yes      | —                        |
    /// | `CONVERTER_URL`         | yes      | —                        |
    /// | `PREROLL_VIDEO_ID`      | no       | —                        |
    /// | `POSTROLL_VIDEO_ID`     | no       | —                        |
    /// | `NOTIFICATION_EMAILS`   | no       | — (comma-separated)      |
    /// | `NOTIFICATION_TEMPLATE` | no       | built-in template        |
    /// | `THUMBNAIL_DIR`         | no       | `thumbnails`             |
    /// | `VIMEO_ACCESS_TOKEN`    | no       | —                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());

        let webhook_token = std::env::var("WEBHOOK_TOKEN").expect("WEBHOOK_TOKEN must be set");
        let converter_url = std::env::var("CONVERTER_URL").expect("CONVERTER_URL must be set");

        let notification_recipients: Vec<String> = std::env::var("NOTIFICATION_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            request_timeout_secs,
            public_base_url,
            webhook_token,
            converter_url,
            preroll_video_id: std::env::var("PREROLL_VIDEO_ID").ok(),
            postroll_video_id: std::env::var("POSTROLL_VIDEO_ID").ok(),
            notification_recipients,
            notification_template: std::env::var("NOTIFICATION_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_TEMPLATE.into()),
            thumbnail_dir: std::env::var("THUMBNAIL_DIR").unwrap_or_else(|_| "thumbnails".into()),
            vimeo_access_token: std::env::var("VIMEO_ACCESS_TOKEN").ok(),
        }
    }
}
