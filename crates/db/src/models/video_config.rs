use pointcam_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The singleton `video_config` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoConfig {
    pub video_enabled: bool,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVideoConfig {
    pub video_enabled: bool,
}
