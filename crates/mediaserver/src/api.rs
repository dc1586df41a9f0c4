//! REST client for the media server's archive inventory.
//!
//! Endpoints, relative to `http://{host}:{http_port}/api`:
//!
//! | Endpoint                                  | Result                     |
//! |-------------------------------------------|----------------------------|
//! | `archive_dates/kam/`                      | `["DD-MM-YYYY", ...]`      |
//! | `archive_hours/kam/{cam}/{YYYY-MM-DD}/`   | `["HH:00", ...]`           |
//! | `points_by_date/kam/{YYYY-MM-DD}/`        | `[spid, ...]`              |
//!
//! Every response is wrapped as `{"result": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use pointcam_core::media::{
    fallback_archive_dates, format_rec_date, parse_archive_date, MediaServerConfig, SITE,
};
use serde::Deserialize;

/// Upper bound on one inventory request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from the inventory API layer.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The HTTP request itself failed (network, DNS, timeout, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The media server returned a non-2xx status code.
    #[error("Inventory API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A record date was not `DD.MM.YYYY`.
    #[error("Invalid record date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

/// What the list endpoints need from the media server.
#[async_trait]
pub trait ArchiveInventory: Send + Sync {
    /// Dates with recorded archives. Falls back to the last 90 days when the
    /// inventory cannot be queried.
    async fn archive_dates(&self) -> Vec<NaiveDate>;

    /// Hours (`HH:00`) recorded for a camera on a `DD.MM.YYYY` date (empty
    /// means today). Falls back to none.
    async fn archive_hours(&self, webcam: &str, rec_date: Option<&str>) -> Vec<String>;

    /// Point ids with archives on a `DD.MM.YYYY` date (empty means today).
    async fn points_by_date(&self, rec_date: Option<&str>) -> Result<Vec<String>, InventoryError>;
}

/// HTTP client for one media server.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: reqwest::Client,
    api_url: String,
}

impl InventoryClient {
    /// Create a client for `api_url`, e.g. `http://media:8080/api`.
    pub fn new(api_url: impl Into<String>) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create a client from media server settings.
    pub fn from_config(config: &MediaServerConfig) -> Result<Self, InventoryError> {
        Self::new(config.api_url())
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// `archive_dates` without the fallback. Unparseable dates are skipped.
    pub async fn fetch_archive_dates(&self) -> Result<Vec<NaiveDate>, InventoryError> {
        let raw: Vec<String> = self.get(&format!("archive_dates/{SITE}/")).await?;
        Ok(raw.iter().filter_map(|d| parse_archive_date(d)).collect())
    }

    /// `archive_hours` without the fallback.
    pub async fn fetch_archive_hours(
        &self,
        webcam: &str,
        rec_date: Option<&str>,
    ) -> Result<Vec<String>, InventoryError> {
        let date = iso_rec_date(rec_date)?;
        self.get(&format!("archive_hours/{SITE}/{webcam}/{date}/"))
            .await
    }

    // ---- private helpers ----

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, InventoryError> {
        let response = self
            .client
            .get(format!("{}/{path}", self.api_url))
            .send()
            .await?;
        let envelope: Envelope<T> = Self::parse_response(response).await?;
        Ok(envelope.result)
    }

    /// Ensure the response has a success status code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, InventoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(InventoryError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, InventoryError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ArchiveInventory for InventoryClient {
    async fn archive_dates(&self) -> Vec<NaiveDate> {
        match self.fetch_archive_dates().await {
            Ok(dates) => dates,
            Err(e) => {
                tracing::warn!(error = %e, "Archive dates unavailable, assuming recent days");
                fallback_archive_dates(today())
            }
        }
    }

    async fn archive_hours(&self, webcam: &str, rec_date: Option<&str>) -> Vec<String> {
        match self.fetch_archive_hours(webcam, rec_date).await {
            Ok(hours) => hours,
            Err(e) => {
                tracing::warn!(error = %e, webcam, "Archive hours unavailable");
                Vec::new()
            }
        }
    }

    async fn points_by_date(&self, rec_date: Option<&str>) -> Result<Vec<String>, InventoryError> {
        let date = iso_rec_date(rec_date)?;
        let raw: Vec<serde_json::Value> = self
            .get(&format!("points_by_date/{SITE}/{date}/"))
            .await?;
        Ok(raw.into_iter().filter_map(spid_text).collect())
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn iso_rec_date(rec_date: Option<&str>) -> Result<String, InventoryError> {
    format_rec_date(rec_date, today())
        .ok_or_else(|| InventoryError::InvalidDate(rec_date.unwrap_or_default().to_string()))
}

/// Point ids arrive as numbers or strings.
fn spid_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = InventoryClient::new("http://media:8080/api/").unwrap();
        assert_eq!(client.api_url(), "http://media:8080/api");
    }

    #[test]
    fn point_ids_accept_numbers_and_strings() {
        assert_eq!(spid_text(json!(100)), Some("100".into()));
        assert_eq!(spid_text(json!("A-7")), Some("A-7".into()));
        assert_eq!(spid_text(json!(null)), None);
    }

    #[test]
    fn invalid_record_date_is_reported() {
        let err = iso_rec_date(Some("2015-01-16")).unwrap_err();
        assert!(matches!(err, InventoryError::InvalidDate(d) if d == "2015-01-16"));
        assert_eq!(iso_rec_date(Some("16.01.2015")).unwrap(), "2015-01-16");
    }
}
