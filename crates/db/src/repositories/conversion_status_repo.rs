//! Repository for the `conversion_statuses` table.

use sqlx::PgPool;
use vodify_core::types::{DbId, Timestamp};
use vodify_core::ConversionStatus;

use crate::models::conversion_status::ConversionStatusRow;

/// Column list for `conversion_statuses` queries.
const COLUMNS: &str =
    "id, event_instance_id, status, details, video_id, changed_at, created_at";

/// Provides create-or-fetch and save operations for conversion statuses.
///
/// There is deliberately no delete: status records are an audit trail of
/// conversion attempts and are never removed by this subsystem.
pub struct ConversionStatusRepo;

impl ConversionStatusRepo {
    /// Fetch the unique record for an event instance, creating it with the
    /// default status `requested` when none exists.
    ///
    /// The insert uses `ON CONFLICT DO NOTHING` against the uniqueness
    /// constraint on `event_instance_id`, so two concurrent first calls
    /// produce exactly one row and both return it.
    pub async fn get_or_create(
        pool: &PgPool,
        event_instance_id: DbId,
    ) -> Result<ConversionStatusRow, sqlx::Error> {
        sqlx::query(
            "INSERT INTO conversion_statuses (event_instance_id) VALUES ($1) \
             ON CONFLICT (event_instance_id) DO NOTHING",
        )
        .bind(event_instance_id)
        .execute(pool)
        .await?;

        let query =
            format!("SELECT {COLUMNS} FROM conversion_statuses WHERE event_instance_id = $1");
        sqlx::query_as::<_, ConversionStatusRow>(&query)
            .bind(event_instance_id)
            .fetch_one(pool)
            .await
    }

    /// Persist one status transition as a single atomic update of all
    /// mutable fields (status, details, video reference, change time).
    pub async fn save(
        pool: &PgPool,
        id: DbId,
        status: ConversionStatus,
        details: &str,
        video_id: Option<DbId>,
        changed_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE conversion_statuses \
             SET status = $2, details = $3, video_id = $4, changed_at = $5 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(details)
        .bind(video_id)
        .bind(changed_at)
        .execute(pool)
        .await?;
        Ok(())
    }
}
