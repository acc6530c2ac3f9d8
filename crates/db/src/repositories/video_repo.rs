//! Repository for the `videos` and `media_assets` tables.

use sqlx::PgPool;
use vodify_core::traits::NewVideo;
use vodify_core::types::DbId;

use crate::models::video::Video;

/// Column list for `videos` queries.
const COLUMNS: &str = "\
    id, title, is_published, instructor, category_ids, equipment_ids, \
    level_id, duration_secs, description, media_asset_id, thumbnail_path, \
    recorded_at, created_at";

/// Creates and reads published-video content.
pub struct VideoRepo;

impl VideoRepo {
    /// Create the media asset and the video record in one transaction.
    ///
    /// The video is created unpublished; staff review it in the CMS before
    /// it goes live. Either both rows land or neither does, so a crash can
    /// never leave a video without its media asset.
    pub async fn create_with_media(pool: &PgPool, video: &NewVideo) -> Result<Video, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let media_asset_id: DbId = sqlx::query_scalar(
            "INSERT INTO media_assets (host_video_id, playback_url, name) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&video.host_video_id)
        .bind(&video.playback_url)
        .bind(&video.title)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO videos \
             (title, instructor, category_ids, equipment_ids, level_id, \
              duration_secs, description, media_asset_id, thumbnail_path, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Video>(&query)
            .bind(&video.title)
            .bind(&video.instructor)
            .bind(serde_json::json!(video.category_ids))
            .bind(serde_json::json!(video.equipment_ids))
            .bind(video.level_id)
            .bind(video.duration_secs)
            .bind(&video.description)
            .bind(media_asset_id)
            .bind(&video.thumbnail_path)
            .bind(video.recorded_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }
}
