//! Handlers for saved filter templates.
//!
//! Templates are private: every operation is scoped to the authenticated
//! user and another user's template answers as not found.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pointcam_core::error::CoreError;
use pointcam_core::types::DbId;
use pointcam_db::models::filter_template::{
    CreateFilterTemplate, UpdateFilterTemplate, MAX_TITLE_LEN,
};
use pointcam_db::repositories::FilterTemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/pointwebcamlist/filter-template
pub async fn list_templates(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = FilterTemplateRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/pointwebcamlist/filter-template
pub async fn create_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateFilterTemplate>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;

    let template = FilterTemplateRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(template_id = template.id, user_id = auth.user_id, "Filter template created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/pointwebcamlist/filter-template/{id}
pub async fn get_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = FilterTemplateRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("FilterTemplate", id))?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/pointwebcamlist/filter-template/{id}
///
/// Omitted fields keep their stored values.
pub async fn update_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFilterTemplate>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        validate_title(title)?;
    }

    let template = FilterTemplateRepo::update_for_user(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("FilterTemplate", id))?;

    tracing::info!(template_id = id, user_id = auth.user_id, "Filter template updated");

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/pointwebcamlist/filter-template/{id}
pub async fn delete_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = FilterTemplateRepo::delete_for_user(&state.pool, id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("FilterTemplate", id)));
    }

    tracing::info!(template_id = id, user_id = auth.user_id, "Filter template deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}
