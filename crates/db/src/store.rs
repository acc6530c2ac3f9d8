//! Postgres implementations of the `vodify-core` collaborator traits.

use async_trait::async_trait;
use vodify_core::traits::{
    ContentStore, ConversionStatusRecord, EventContext, EventDirectory, NewVideo, PublishedVideo,
    StatusStore,
};
use vodify_core::types::DbId;
use vodify_core::CoreError;

use crate::repositories::{ConversionStatusRepo, EventRepo, VideoRepo};
use crate::DbPool;

fn db_error(err: sqlx::Error) -> CoreError {
    CoreError::Internal(format!("database error: {err}"))
}

/// [`StatusStore`] backed by the `conversion_statuses` table.
#[derive(Clone)]
pub struct PgStatusStore {
    pool: DbPool,
}

impl PgStatusStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusStore for PgStatusStore {
    async fn get_or_create(
        &self,
        event_instance_id: DbId,
    ) -> Result<ConversionStatusRecord, CoreError> {
        ConversionStatusRepo::get_or_create(&self.pool, event_instance_id)
            .await
            .map_err(db_error)?
            .into_record()
    }

    async fn save(&self, record: &ConversionStatusRecord) -> Result<(), CoreError> {
        ConversionStatusRepo::save(
            &self.pool,
            record.id,
            record.status,
            &record.details,
            record.video_id,
            record.changed_at,
        )
        .await
        .map_err(db_error)
    }
}

/// [`ContentStore`] backed by the `videos` and `media_assets` tables.
#[derive(Clone)]
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn create_video(&self, video: NewVideo) -> Result<PublishedVideo, CoreError> {
        let row = VideoRepo::create_with_media(&self.pool, &video)
            .await
            .map_err(db_error)?;
        Ok(PublishedVideo {
            id: row.id,
            title: row.title,
            media_asset_id: row.media_asset_id,
        })
    }
}

/// [`EventDirectory`] backed by the `event_instances`/`event_series` tables.
#[derive(Clone)]
pub struct PgEventDirectory {
    pool: DbPool,
}

impl PgEventDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventDirectory for PgEventDirectory {
    async fn find(&self, event_instance_id: DbId) -> Result<Option<EventContext>, CoreError> {
        let row = EventRepo::find_context(&self.pool, event_instance_id)
            .await
            .map_err(db_error)?;
        Ok(row.map(|r| r.into_context()))
    }
}
