//! Shared response envelope types for API handlers.
//!
//! All JSON responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a list.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    /// Total number of matching records.
    pub count: i64,
    pub page: i64,
    pub per_page: i64,
    pub results: Vec<T>,
}
