//! Saved filter specifications, owned per user.

use pointcam_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum title length, matching the column width.
pub const MAX_TITLE_LEN: usize = 255;

/// A `webcam_filter_templates` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FilterTemplate {
    pub id: DbId,
    pub title: String,
    pub filters: Option<serde_json::Value>,
    pub user_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a template. The owner comes from the request's
/// credentials, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFilterTemplate {
    pub title: String,
    pub filters: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFilterTemplate {
    pub title: Option<String>,
    pub filters: Option<serde_json::Value>,
}
