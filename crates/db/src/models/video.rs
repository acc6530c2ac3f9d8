//! Video entity model.

use serde::Serialize;
use sqlx::FromRow;
use vodify_core::types::{DbId, Timestamp};

/// A row from the `videos` table.
///
/// Taxonomy id lists are stored as JSONB arrays of integers.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub id: DbId,
    pub title: String,
    pub is_published: bool,
    pub instructor: String,
    pub category_ids: serde_json::Value,
    pub equipment_ids: serde_json::Value,
    pub level_id: Option<DbId>,
    pub duration_secs: i64,
    pub description: String,
    pub media_asset_id: DbId,
    pub thumbnail_path: Option<String>,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}
