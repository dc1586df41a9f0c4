//! Route definitions for the webcam list surface under `/pointwebcamlist`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{filter_templates, webcams};
use crate::state::AppState;

/// ```text
/// GET    /pointwebcamlist                             -> list_webcams
/// GET    /pointwebcamlist/filter-params               -> filter_params
/// GET    /pointwebcamlist/field-autocomplete          -> field_autocomplete
/// GET    /pointwebcamlist/archive-list/{spid}/{slug}  -> archive_list
/// GET    /pointwebcamlist/check-status                -> check_status
/// GET    /pointwebcamlist/export                      -> export_webcams
/// GET    /pointwebcamlist/filter-template             -> list_templates
/// POST   /pointwebcamlist/filter-template             -> create_template
/// GET    /pointwebcamlist/filter-template/{id}        -> get_template
/// PUT    /pointwebcamlist/filter-template/{id}        -> update_template
/// DELETE /pointwebcamlist/filter-template/{id}        -> delete_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pointwebcamlist", get(webcams::list_webcams))
        .route("/pointwebcamlist/filter-params", get(webcams::filter_params))
        .route("/pointwebcamlist/field-autocomplete", get(webcams::field_autocomplete))
        .route("/pointwebcamlist/archive-list/{spid}/{slug}", get(webcams::archive_list))
        .route("/pointwebcamlist/check-status", get(webcams::check_status))
        .route("/pointwebcamlist/export", get(webcams::export_webcams))
        .route(
            "/pointwebcamlist/filter-template",
            get(filter_templates::list_templates).post(filter_templates::create_template),
        )
        .route(
            "/pointwebcamlist/filter-template/{id}",
            get(filter_templates::get_template)
                .put(filter_templates::update_template)
                .delete(filter_templates::delete_template),
        )
}
