//! Gate for the webcam list surface.
//!
//! The stored `video_config` row wins; without one the `VIDEO_ENABLED`
//! process default applies.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pointcam_core::error::CoreError;
use pointcam_db::repositories::VideoConfigRepo;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Requires an authenticated user and video monitoring switched on.
/// Rejects with 403 Forbidden while it is off.
pub struct VideoAccess(pub AuthUser);

impl FromRequestParts<AppState> for VideoAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !video_enabled(state).await? {
            return Err(AppError::Core(CoreError::Forbidden(
                "Video monitoring is disabled".into(),
            )));
        }
        Ok(VideoAccess(user))
    }
}

/// Effective value of the video toggle.
pub async fn video_enabled(state: &AppState) -> AppResult<bool> {
    let stored = VideoConfigRepo::get(&state.pool).await?;
    Ok(stored.map_or(state.config.video_enabled, |c| c.video_enabled))
}
