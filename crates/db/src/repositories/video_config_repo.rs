use sqlx::PgPool;

use crate::models::video_config::VideoConfig;

pub struct VideoConfigRepo;

impl VideoConfigRepo {
    /// The stored toggle, or `None` if it was never saved.
    pub async fn get(pool: &PgPool) -> Result<Option<VideoConfig>, sqlx::Error> {
        sqlx::query_as::<_, VideoConfig>(
            "SELECT video_enabled, updated_at FROM video_config WHERE id = 1",
        )
        .fetch_optional(pool)
        .await
    }

    /// Create or replace the singleton row.
    pub async fn upsert(pool: &PgPool, video_enabled: bool) -> Result<VideoConfig, sqlx::Error> {
        sqlx::query_as::<_, VideoConfig>(
            "INSERT INTO video_config (id, video_enabled) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET video_enabled = EXCLUDED.video_enabled, \
                updated_at = now() \
             RETURNING video_enabled, updated_at",
        )
        .bind(video_enabled)
        .fetch_one(pool)
        .await
    }
}
