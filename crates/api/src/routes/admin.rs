//! Route definitions for the admin screens, mounted at `/admin`.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET    /webcams               -> list_webcams
/// POST   /webcams               -> create_webcam
/// GET    /webcams/{id}          -> get_webcam
/// PUT    /webcams/{id}          -> update_webcam
/// GET    /points                -> list_points
/// GET    /points/{spid}         -> get_point
/// GET    /responsibles          -> list_responsibles
/// GET    /video-config          -> get_video_config
/// PUT    /video-config          -> update_video_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/webcams",
            get(admin::list_webcams).post(admin::create_webcam),
        )
        .route(
            "/webcams/{id}",
            get(admin::get_webcam).put(admin::update_webcam),
        )
        .route("/points", get(admin::list_points))
        .route("/points/{spid}", get(admin::get_point))
        .route("/responsibles", get(admin::list_responsibles))
        .route(
            "/video-config",
            get(admin::get_video_config).put(admin::update_video_config),
        )
}
