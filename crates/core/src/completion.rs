//! Completion details carried by a `completed` webhook callback.
//!
//! Everything in here is attacker-controlled input: the payload arrives on
//! an endpoint guarded only by a shared token. Fields are deserialized
//! leniently (the converter is sloppy about numeric vs. string ids) and
//! then validated before any of it reaches materialization.

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Details reported by the converter when a job completes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionDetails {
    /// External video-host asset identifier of the produced video.
    #[serde(default, deserialize_with = "string_or_number")]
    pub video_id: String,

    /// Display name for the published video.
    #[serde(default)]
    pub video_name: String,

    /// Instructor name.
    #[serde(default)]
    pub host_name: String,

    /// Category taxonomy term ids.
    #[serde(default)]
    pub categories: Vec<DbId>,

    /// Equipment taxonomy term ids.
    #[serde(default)]
    pub equipment: Vec<DbId>,

    /// Level taxonomy term id.
    #[serde(default)]
    pub level: Option<DbId>,

    /// Clip duration in seconds.
    #[serde(default)]
    pub duration: i64,

    /// Unix timestamp of the original recording date.
    #[serde(default)]
    pub video_date: i64,

    /// Source URL to generate the thumbnail from.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl CompletionDetails {
    /// Check the fields materialization cannot proceed without.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.video_id.trim().is_empty() {
            return Err(CoreError::Validation("videoId is missing".into()));
        }
        if self.video_name.trim().is_empty() {
            return Err(CoreError::Validation("videoName is missing".into()));
        }
        if self.duration < 0 {
            return Err(CoreError::Validation("duration must not be negative".into()));
        }
        Ok(())
    }

    /// Canonical playback URL for the produced host asset.
    pub fn playback_url(&self) -> String {
        format!("https://vimeo.com/{}", self.video_id.trim())
    }

    /// Recording date as a UTC timestamp, falling back to now when the
    /// converter sent nothing usable.
    pub fn recorded_at(&self) -> Timestamp {
        match Utc.timestamp_opt(self.video_date, 0).single() {
            Some(ts) if self.video_date > 0 => ts,
            _ => Utc::now(),
        }
    }
}

/// Accept both `"12345"` and `12345` for id-like fields.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
