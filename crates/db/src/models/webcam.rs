//! Webcam rows, the joined list record and its API projection.

use chrono::NaiveDate;
use pointcam_core::filter::{FieldSource, FieldValue};
use pointcam_core::monitor::{SweepTarget, DEFAULT_PORT, SENTINEL_IP};
use pointcam_core::status::WebcamStatus;
use pointcam_core::types::{format_display_date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A `webcams` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Webcam {
    pub id: DbId,
    pub point_id: DbId,
    pub name: String,
    pub slug: String,
    pub responsible_id: Option<DbId>,
    pub ip: String,
    pub port: i32,
    pub host: Option<String>,
    pub installed: Option<NaiveDate>,
    pub online: i16,
    pub created_at: Timestamp,
}

impl Webcam {
    pub fn status(&self) -> WebcamStatus {
        WebcamStatus::from_code(self.online).unwrap_or_default()
    }

    pub fn sweep_target(&self) -> SweepTarget {
        SweepTarget {
            id: self.id,
            ip: self.ip.clone(),
            port: self.port,
            online: self.status(),
        }
    }
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// Input for creating a webcam. Omitted network fields take the schema
/// defaults (`0.0.0.0:554`).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWebcam {
    pub point_id: DbId,
    pub name: String,
    pub slug: String,
    pub responsible_id: Option<DbId>,
    pub ip: Option<String>,
    pub port: Option<i32>,
    pub host: Option<String>,
    pub installed: Option<NaiveDate>,
}

impl CreateWebcam {
    pub fn ip_or_default(&self) -> &str {
        self.ip.as_deref().unwrap_or(SENTINEL_IP)
    }

    pub fn port_or_default(&self) -> i32 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}

/// Input for updating a webcam. All fields are optional; status is owned by
/// the poller and cannot be edited.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWebcam {
    pub point_id: Option<DbId>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub responsible_id: Option<DbId>,
    pub ip: Option<String>,
    pub port: Option<i32>,
    pub host: Option<String>,
    pub installed: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// List record
// ---------------------------------------------------------------------------

/// A webcam joined with its point, city, trade network and responsible
/// person, as fetched by the list and export endpoints.
#[derive(Debug, Clone, FromRow)]
pub struct WebcamRecord {
    pub id: DbId,
    pub point_id: DbId,
    pub point_name: String,
    pub point_spid: String,
    pub point_address: String,
    pub trade_network: Option<String>,
    pub city_name: Option<String>,
    pub name: String,
    pub slug: String,
    pub responsible_id: Option<DbId>,
    pub responsible_first_name: Option<String>,
    pub responsible_last_name: Option<String>,
    pub ip: String,
    pub port: i32,
    pub host: Option<String>,
    pub installed: Option<NaiveDate>,
    pub online: i16,
    pub created_at: Timestamp,
}

impl WebcamRecord {
    pub fn status(&self) -> WebcamStatus {
        WebcamStatus::from_code(self.online).unwrap_or_default()
    }

    /// `"Last First"`, or `None` without a responsible person.
    pub fn responsible_full_name(&self) -> Option<String> {
        self.responsible_id?;
        Some(full_name(
            self.responsible_last_name.as_deref().unwrap_or_default(),
            self.responsible_first_name.as_deref().unwrap_or_default(),
        ))
    }

    /// Build the API projection. The live-stream URL is signed by the caller.
    pub fn project(&self, livestream_url: String) -> WebcamProjection {
        let status = self.status();
        WebcamProjection {
            id: self.id,
            point: PointProjection {
                id: self.point_id,
                name: self.point_name.clone(),
                spid: self.point_spid.clone(),
                trade_network: self
                    .trade_network
                    .clone()
                    .unwrap_or_else(|| NO_TRADE_NETWORK.to_string()),
                city: self.city_name.clone().map(|name| CityProjection { name }),
                address: self.point_address.clone(),
            },
            name: self.name.clone(),
            slug: self.slug.clone(),
            responsible: self.responsible_id.map(|id| ResponsibleProjection {
                id,
                last_name: self.responsible_full_name().unwrap_or_default(),
            }),
            online: StatusProjection {
                status,
                status_name: status.label(),
            },
            ip: self.ip.clone(),
            installed: self.installed.map(format_display_date),
            livestream_url,
        }
    }
}

impl FieldSource for WebcamRecord {
    fn field(&self, path: &str) -> FieldValue {
        let text = |value: &str| FieldValue::Text(value.to_string());
        let optional = |value: &Option<String>| value.as_deref().map_or(FieldValue::Null, text);
        match path {
            "id" => FieldValue::Int(self.id),
            "name" => text(&self.name),
            "slug" => text(&self.slug),
            "ip" => text(&self.ip),
            "online" => FieldValue::Int(i64::from(self.online)),
            "installed" => self.installed.map_or(FieldValue::Null, FieldValue::Date),
            "point.name" => text(&self.point_name),
            "point.spid" => text(&self.point_spid),
            "point.address" => text(&self.point_address),
            "point.trade_network" => optional(&self.trade_network),
            "point.city.name" => optional(&self.city_name),
            "responsible.last_name" => optional(&self.responsible_last_name),
            "responsible.first_name" => optional(&self.responsible_first_name),
            _ => FieldValue::Null,
        }
    }
}

/// Shown when a point has no trade network.
pub const NO_TRADE_NETWORK: &str = "-";

/// Join a last and first name the way the list displays them.
pub fn full_name(last_name: &str, first_name: &str) -> String {
    format!("{last_name} {first_name}").trim().to_string()
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// The list/export representation of a webcam. Keys match the dotted field
/// paths of the field catalog.
#[derive(Debug, Clone, Serialize)]
pub struct WebcamProjection {
    pub id: DbId,
    pub point: PointProjection,
    pub name: String,
    pub slug: String,
    pub responsible: Option<ResponsibleProjection>,
    pub online: StatusProjection,
    pub ip: String,
    /// `DD.MM.YYYY`.
    pub installed: Option<String>,
    pub livestream_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointProjection {
    pub id: DbId,
    pub name: String,
    pub spid: String,
    pub trade_network: String,
    pub city: Option<CityProjection>,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityProjection {
    pub name: String,
}

/// Responsible person; `last_name` carries the full display name.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsibleProjection {
    pub id: DbId,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusProjection {
    pub status: WebcamStatus,
    pub status_name: &'static str,
}
