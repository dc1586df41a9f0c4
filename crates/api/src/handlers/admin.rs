//! Admin handlers: webcam editing, the point-of-sale projection, the
//! responsible picker and the video toggle.
//!
//! All endpoints require the admin role. Webcams cannot be deleted and their
//! status is owned by the status sweep.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pointcam_core::error::CoreError;
use pointcam_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use pointcam_core::types::{DbId, Timestamp};
use pointcam_db::models::point::{PointWebcam, PointWebcamFilter};
use pointcam_db::models::video_config::UpdateVideoConfig;
use pointcam_db::models::webcam::{CreateWebcam, UpdateWebcam};
use pointcam_db::repositories::{PointWebcamRepo, ProfileRepo, VideoConfigRepo, WebcamRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Webcams
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/webcams
pub async fn list_webcams(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let webcams = WebcamRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: webcams }))
}

/// POST /api/v1/admin/webcams
pub async fn create_webcam(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateWebcam>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    validate_slug(&input.slug)?;
    validate_port(input.port)?;

    let webcam = WebcamRepo::create(&state.pool, &input).await?;

    tracing::info!(
        webcam_id = webcam.id,
        point_id = webcam.point_id,
        user_id = admin.user_id,
        "Webcam created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: webcam })))
}

/// GET /api/v1/admin/webcams/{id}
pub async fn get_webcam(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let webcam = WebcamRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Webcam", id))?;
    Ok(Json(DataResponse { data: webcam }))
}

/// PUT /api/v1/admin/webcams/{id}
///
/// Omitted fields keep their stored values.
pub async fn update_webcam(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWebcam>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }
    validate_port(input.port)?;

    let webcam = WebcamRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Webcam", id))?;

    tracing::info!(webcam_id = id, user_id = admin.user_id, "Webcam updated");

    Ok(Json(DataResponse { data: webcam }))
}

// ---------------------------------------------------------------------------
// Points of sale
// ---------------------------------------------------------------------------

/// A point row with its first webcam's status label.
#[derive(Debug, Serialize)]
pub struct PointWebcamView {
    #[serde(flatten)]
    pub point: PointWebcam,
    pub wc_status_name: Option<&'static str>,
}

impl From<PointWebcam> for PointWebcamView {
    fn from(point: PointWebcam) -> Self {
        let wc_status_name = point.wc_status().map(|s| s.label());
        Self {
            point,
            wc_status_name,
        }
    }
}

/// GET /api/v1/admin/points?search=&city_id=&online=&responsible_id=
pub async fn list_points(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(filter): Query<PointWebcamFilter>,
) -> AppResult<impl IntoResponse> {
    let points: Vec<PointWebcamView> = PointWebcamRepo::list(&state.pool, &filter)
        .await?
        .into_iter()
        .map(PointWebcamView::from)
        .collect();
    Ok(Json(DataResponse { data: points }))
}

/// GET /api/v1/admin/points/{spid}
pub async fn get_point(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(spid): Path<String>,
) -> AppResult<impl IntoResponse> {
    let point = PointWebcamRepo::find_by_spid(&state.pool, &spid)
        .await?
        .ok_or_else(|| CoreError::not_found("Point", &spid))?;
    Ok(Json(DataResponse {
        data: PointWebcamView::from(point),
    }))
}

/// GET /api/v1/admin/responsibles
pub async fn list_responsibles(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let people = ProfileRepo::list_responsibles(&state.pool).await?;
    Ok(Json(DataResponse { data: people }))
}

// ---------------------------------------------------------------------------
// Video toggle
// ---------------------------------------------------------------------------

/// Effective toggle value and where it came from.
#[derive(Debug, Serialize)]
pub struct VideoConfigView {
    pub video_enabled: bool,
    /// `false` when the process default applies.
    pub stored: bool,
    pub updated_at: Option<Timestamp>,
}

/// GET /api/v1/admin/video-config
pub async fn get_video_config(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let view = match VideoConfigRepo::get(&state.pool).await? {
        Some(config) => VideoConfigView {
            video_enabled: config.video_enabled,
            stored: true,
            updated_at: Some(config.updated_at),
        },
        None => VideoConfigView {
            video_enabled: state.config.video_enabled,
            stored: false,
            updated_at: None,
        },
    };
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/admin/video-config
pub async fn update_video_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpdateVideoConfig>,
) -> AppResult<impl IntoResponse> {
    let config = VideoConfigRepo::upsert(&state.pool, input.video_enabled).await?;

    tracing::info!(
        video_enabled = config.video_enabled,
        user_id = admin.user_id,
        "Video toggle updated"
    );

    Ok(Json(DataResponse {
        data: VideoConfigView {
            video_enabled: config.video_enabled,
            stored: true,
            updated_at: Some(config.updated_at),
        },
    }))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// Slugs appear in stream names and archive paths.
fn validate_slug(slug: &str) -> Result<(), CoreError> {
    let valid = !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(CoreError::Validation(
            "slug may only contain latin letters, digits and '-'".into(),
        ));
    }
    Ok(())
}

fn validate_port(port: Option<i32>) -> Result<(), CoreError> {
    match port {
        Some(p) if !(1..=65535).contains(&p) => Err(CoreError::Validation(format!(
            "port must be between 1 and 65535, got {p}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn slugs_are_url_safe() {
        assert!(validate_slug("kamera-2").is_ok());
        assert_matches!(validate_slug(""), Err(CoreError::Validation(_)));
        assert_matches!(validate_slug("kamera_2"), Err(CoreError::Validation(_)));
        assert_matches!(validate_slug("камера"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn ports_are_bounded() {
        assert!(validate_port(None).is_ok());
        assert!(validate_port(Some(554)).is_ok());
        assert_matches!(validate_port(Some(0)), Err(CoreError::Validation(_)));
        assert_matches!(validate_port(Some(70000)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_matches!(validate_name("  "), Err(CoreError::Validation(_)));
        assert!(validate_name("Касса").is_ok());
    }
}
