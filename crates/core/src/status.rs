//! Conversion status lifecycle.
//!
//! The external converter reports one of five statuses per callback. The
//! wire format uses the lowercase names (`requested`, `started`, ...),
//! which is also how the status is stored in the `conversion_statuses`
//! table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a conversion job for one event instance.
///
/// Lifecycle: `Requested → Started → Progress* → {Completed | Failure}`.
/// `Completed` and `Failure` are terminal for a job attempt; a new
/// `Requested` event starts a fresh cycle (re-conversion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Requested,
    Started,
    Progress,
    Completed,
    Failure,
}

impl ConversionStatus {
    /// The lowercase wire/storage name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            ConversionStatus::Requested => "requested",
            ConversionStatus::Started => "started",
            ConversionStatus::Progress => "progress",
            ConversionStatus::Completed => "completed",
            ConversionStatus::Failure => "failure",
        }
    }

    /// Whether no further automatic transition is expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, ConversionStatus::Completed | ConversionStatus::Failure)
    }
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionStatus {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(ConversionStatus::Requested),
            "started" => Ok(ConversionStatus::Started),
            "progress" => Ok(ConversionStatus::Progress),
            "completed" => Ok(ConversionStatus::Completed),
            "failure" => Ok(ConversionStatus::Failure),
            other => Err(crate::error::CoreError::Validation(format!(
                "Unknown conversion status: {other}"
            ))),
        }
    }
}
