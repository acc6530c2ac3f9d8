//! Repository for event instances and their series.

use sqlx::PgPool;
use vodify_core::types::DbId;

use crate::models::event::EventContextRow;

/// Read-only lookups of event instances.
pub struct EventRepo;

impl EventRepo {
    /// Fetch the joined instance/series context for an event instance.
    ///
    /// The instance description falls back to the series description when
    /// the occurrence has no override of its own.
    pub async fn find_context(
        pool: &PgPool,
        event_instance_id: DbId,
    ) -> Result<Option<EventContextRow>, sqlx::Error> {
        sqlx::query_as::<_, EventContextRow>(
            "SELECT s.title AS series_title, \
                    s.host_name, \
                    COALESCE(NULLIF(i.description, ''), s.description) AS description, \
                    s.category_ids, \
                    s.equipment_ids, \
                    s.level_id, \
                    s.stream_url, \
                    i.starts_at \
             FROM event_instances i \
             JOIN event_series s ON s.id = i.series_id \
             WHERE i.id = $1",
        )
        .bind(event_instance_id)
        .fetch_optional(pool)
        .await
    }
}
