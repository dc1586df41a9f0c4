pub mod admin;
pub mod health;
pub mod webcams;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /pointwebcamlist                                 list, export, archive, status
/// /pointwebcamlist/filter-template                 per-user templates
///
/// /admin/webcams                                   list, create (admin only)
/// /admin/webcams/{id}                              get, update
/// /admin/points                                    point projection
/// /admin/points/{spid}                             one point
/// /admin/responsibles                              responsible picker
/// /admin/video-config                              get, update toggle
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(webcams::router())
        .nest("/admin", admin::router())
}
