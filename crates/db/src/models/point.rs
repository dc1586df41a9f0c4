//! Point-of-sale projection for the webcam admin screens.
//!
//! Read-only: points are owned by the directory. Each row carries the
//! fields of the point's first webcam (lowest id) for at-a-glance listing.

use chrono::NaiveDate;
use pointcam_core::status::WebcamStatus;
use pointcam_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A point that may host webcams, with its first webcam's details.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointWebcam {
    pub id: DbId,
    pub spid: String,
    pub name: String,
    pub address: String,
    pub city_name: Option<String>,
    pub webcam_count: i64,
    pub wc_id: Option<DbId>,
    pub wc_installed: Option<NaiveDate>,
    /// Full name of the first webcam's responsible person.
    pub wc_responsible: Option<String>,
    pub wc_online: Option<i16>,
    pub wc_ip: Option<String>,
}

impl PointWebcam {
    pub fn wc_status(&self) -> Option<WebcamStatus> {
        self.wc_online.and_then(WebcamStatus::from_code)
    }
}

/// Query parameters for the admin point list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointWebcamFilter {
    /// Free-text search. A leading `=` matches the point id exactly;
    /// otherwise point name and address, city, webcam name and ip, and the
    /// responsible person's names are searched case-insensitively.
    pub search: Option<String>,
    pub city_id: Option<DbId>,
    /// Machine name of a webcam status (`off`, `on`, `error`).
    pub online: Option<String>,
    pub responsible_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
