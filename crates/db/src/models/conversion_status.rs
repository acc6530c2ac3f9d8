//! Conversion-status entity model.

use serde::Serialize;
use sqlx::FromRow;
use vodify_core::traits::ConversionStatusRecord;
use vodify_core::types::{DbId, Timestamp};
use vodify_core::{ConversionStatus, CoreError};

/// A row from the `conversion_statuses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversionStatusRow {
    pub id: DbId,
    pub event_instance_id: DbId,
    pub status: String,
    pub details: String,
    pub video_id: Option<DbId>,
    pub changed_at: Timestamp,
    pub created_at: Timestamp,
}

impl ConversionStatusRow {
    /// Convert into the domain record, parsing the stored status name.
    ///
    /// A row with an unparseable status can only come from manual edits;
    /// it is reported as an internal error rather than defaulted away.
    pub fn into_record(self) -> Result<ConversionStatusRecord, CoreError> {
        let status: ConversionStatus = self
            .status
            .parse()
            .map_err(|e: CoreError| CoreError::Internal(e.to_string()))?;
        Ok(ConversionStatusRecord {
            id: self.id,
            event_instance_id: self.event_instance_id,
            status,
            details: self.details,
            video_id: self.video_id,
            changed_at: self.changed_at,
        })
    }
}
