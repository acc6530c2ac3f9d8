//! Event instance/series context model.

use sqlx::FromRow;
use vodify_core::traits::EventContext;
use vodify_core::types::{DbId, Timestamp};

/// Joined view of an event instance and its series, as consumed by
/// materialization and the conversion-form prefill.
#[derive(Debug, Clone, FromRow)]
pub struct EventContextRow {
    pub series_title: String,
    pub host_name: String,
    pub description: String,
    pub category_ids: serde_json::Value,
    pub equipment_ids: serde_json::Value,
    pub level_id: Option<DbId>,
    pub stream_url: String,
    pub starts_at: Timestamp,
}

impl EventContextRow {
    pub fn into_context(self) -> EventContext {
        EventContext {
            series_title: self.series_title,
            host_name: self.host_name,
            description: self.description,
            category_ids: id_list(&self.category_ids),
            equipment_ids: id_list(&self.equipment_ids),
            level_id: self.level_id,
            stream_url: self.stream_url,
            starts_at: self.starts_at,
        }
    }
}

/// Decode a JSONB integer array, dropping anything that is not an id.
fn id_list(value: &serde_json::Value) -> Vec<DbId> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_i64()).collect())
        .unwrap_or_default()
}
