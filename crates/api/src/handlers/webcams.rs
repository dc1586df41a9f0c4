//! Handlers for the webcam list surface (`/pointwebcamlist`).
//!
//! Everything except `filter-params` is gated by [`VideoAccess`]. Bad filter
//! syntax degrades to an unfiltered list; structurally malformed entries are
//! rejected as not found.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use pointcam_core::error::CoreError;
use pointcam_core::export;
use pointcam_core::filter::{catalog, parse_ordering, FilterQuery, FilterSpec, ARCHIVE_DATE_FIELD};
use pointcam_core::media::MediaServerConfig;
use pointcam_core::pagination::Page;
use pointcam_core::status::labels_matching;
use pointcam_core::types::{format_display_date, parse_display_date};
use pointcam_db::models::webcam::{WebcamProjection, WebcamRecord};
use pointcam_db::repositories::WebcamRepo;
use pointcam_mediaserver::resolve_archive_index;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::middleware::video::VideoAccess;
use crate::monitor::run_sweep;
use crate::query::{ArchiveListParams, AutocompleteParams, ExportParams, WebcamListParams};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/pointwebcamlist
///
/// Filtered, sorted, paginated webcam projections.
pub async fn list_webcams(
    _access: VideoAccess,
    State(state): State<AppState>,
    Query(params): Query<WebcamListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = resolve_filter(&state, params.filters.as_deref()).await?;
    let ordering = parse_ordering(params.sort_by.as_deref());
    let page = Page::new(params.page, params.per_page);

    let count = WebcamRepo::count_records(&state.pool, &filter).await?;
    let records = WebcamRepo::list_records(
        &state.pool,
        &filter,
        &ordering,
        page.limit(),
        page.offset(),
    )
    .await?;
    let results = project_all(&state.config.media, &records)?;

    Ok(Json(DataResponse {
        data: PageResponse {
            count,
            page: page.page,
            per_page: page.per_page,
            results,
        },
    }))
}

/// GET /api/v1/pointwebcamlist/filter-params
///
/// The field metadata catalog. Not gated by the video toggle.
pub async fn filter_params(_auth: RequireAuth) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: catalog::describe_all(),
    }))
}

/// GET /api/v1/pointwebcamlist/field-autocomplete?field=&q=
///
/// Distinct values of `field` containing `q`. Unknown or missing fields
/// yield an empty list.
pub async fn field_autocomplete(
    _access: VideoAccess,
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> AppResult<impl IntoResponse> {
    let Some(field) = params.field.as_deref().map(str::trim) else {
        return Ok(Json(DataResponse { data: Vec::new() }));
    };

    let values: Vec<String> = match field {
        ARCHIVE_DATE_FIELD => state
            .inventory
            .archive_dates()
            .await
            .into_iter()
            .map(format_display_date)
            .collect(),
        "online" => labels_matching(&params.q)
            .into_iter()
            .map(str::to_string)
            .collect(),
        _ => WebcamRepo::autocomplete(&state.pool, field, &params.q)
            .await?
            .unwrap_or_default(),
    };

    Ok(Json(DataResponse { data: values }))
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// GET /api/v1/pointwebcamlist/archive-list/{spid}/{slug}?date=DD.MM.YYYY
///
/// Signed view/download links for each archived hour of one camera on one
/// day. Without a usable date the list is empty.
pub async fn archive_list(
    _access: VideoAccess,
    State(state): State<AppState>,
    Path((spid, slug)): Path<(String, String)>,
    Query(params): Query<ArchiveListParams>,
) -> AppResult<impl IntoResponse> {
    let Some(raw_date) = params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(Json(DataResponse { data: Vec::new() }));
    };

    WebcamRepo::find_by_point_and_slug(&state.pool, &spid, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Webcam", format!("{spid}/{slug}")))?;

    let Some(date) = parse_display_date(raw_date) else {
        tracing::debug!(date = raw_date, "Unparseable archive date");
        return Ok(Json(DataResponse { data: Vec::new() }));
    };

    let hours = state.inventory.archive_hours(&slug, Some(raw_date)).await;
    let entries = state.config.media.archive_entries(
        &spid,
        &slug,
        date,
        &hours,
        Utc::now().timestamp(),
    )?;

    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/v1/pointwebcamlist/check-status
///
/// Probe every potentially live webcam and report its new status by id.
pub async fn check_status(
    VideoAccess(user): VideoAccess,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let report = run_sweep(&state.pool, state.probe.as_ref()).await?;

    tracing::info!(user_id = user.user_id, checked = report.len(), "Status sweep requested");

    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/pointwebcamlist/export?filters=&sort_by=&visible_cols=
///
/// The whole filtered list as an `.xlsx` attachment.
pub async fn export_webcams(
    VideoAccess(user): VideoAccess,
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<impl IntoResponse> {
    let filter = resolve_filter(&state, params.filters.as_deref()).await?;
    let ordering = parse_ordering(params.sort_by.as_deref());
    let columns = export::resolve_columns(params.visible_cols.as_deref());

    let records = WebcamRepo::list_all_records(&state.pool, &filter, &ordering).await?;
    let rows = project_all(&state.config.media, &records)?
        .into_iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let body = export::build_workbook(&columns, &rows)?;

    tracing::info!(
        user_id = user.user_id,
        rows = rows.len(),
        columns = columns.len(),
        "Webcam list exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, export::CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, export::content_disposition()),
        ],
        body,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse the `filters` parameter and resolve `archive_date` values through
/// the inventory.
async fn resolve_filter(state: &AppState, raw: Option<&str>) -> AppResult<FilterQuery> {
    let spec = FilterSpec::from_param(raw)?;
    let archive = resolve_archive_index(state.inventory.as_ref(), &spec.archive_dates()).await;
    Ok(spec.to_query(&archive)?)
}

fn project_all(
    media: &MediaServerConfig,
    records: &[WebcamRecord],
) -> AppResult<Vec<WebcamProjection>> {
    records
        .iter()
        .map(|record| {
            let url = media.live_stream_url(&record.point_spid, &record.slug)?;
            Ok(record.project(url))
        })
        .collect()
}
