//! Shared query parameter types for API handlers.
//!
//! The webcam list endpoints take JSON-encoded parameters as raw strings;
//! parsing and its fallbacks live in `pointcam_core::filter` and
//! `pointcam_core::export`.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `GET /pointwebcamlist?filters=&sort_by=&page=&per_page=`
#[derive(Debug, Default, Deserialize)]
pub struct WebcamListParams {
    /// JSON object of `field -> [[operator, value], ...]`.
    pub filters: Option<String>,
    /// JSON array of field paths, `-` prefix for descending.
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `GET /pointwebcamlist/export?filters=&sort_by=&visible_cols=`
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub filters: Option<String>,
    pub sort_by: Option<String>,
    /// JSON array of field paths.
    pub visible_cols: Option<String>,
}

/// `GET /pointwebcamlist/field-autocomplete?field=&q=`
#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteParams {
    pub field: Option<String>,
    #[serde(default)]
    pub q: String,
}

/// `GET /pointwebcamlist/archive-list/{spid}/{slug}?date=`
#[derive(Debug, Default, Deserialize)]
pub struct ArchiveListParams {
    /// `DD.MM.YYYY`.
    pub date: Option<String>,
}
