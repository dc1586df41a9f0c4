//! Media-server addressing: live-stream URLs, archive links and the
//! date conventions of the inventory API.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::signing::{SecureLink, SigningError};
use crate::types::parse_display_date;

/// Site segment used in every inventory and stream path.
pub const SITE: &str = "kam";

/// How far back archives are assumed to exist when the inventory is down.
pub const ARCHIVE_MAX_DAYS: i64 = 90;

/// Date format used by the inventory in responses and archive file names.
pub const ARCHIVE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Hourly archive window, `08:00` through `20:00`.
pub const ARCHIVE_HOURS: [&str; 13] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
    "18:00", "19:00", "20:00",
];

/// Media server location and signing key.
#[derive(Debug, Clone)]
pub struct MediaServerConfig {
    pub host: String,
    pub http_port: u16,
    pub rtmp_port: u16,
    pub secret: String,
}

impl MediaServerConfig {
    /// Base URL of the inventory API.
    pub fn api_url(&self) -> String {
        format!("http://{}:{}/api", self.host, self.http_port)
    }

    /// Signer for archive and download links.
    pub fn signer(&self) -> SecureLink {
        SecureLink::new(self.secret.clone())
    }

    /// Signed RTMP URL of a camera's live stream.
    pub fn live_stream_url(&self, spid: &str, slug: &str) -> Result<String, SigningError> {
        let url = format!(
            "rtmp://{}:{}/{SITE}/{SITE}_sp{spid}_{slug}",
            self.host, self.rtmp_port
        );
        self.signer().sign_live(&url)
    }

    /// Unsigned archive file URL.
    pub fn archive_url(&self, file: &ArchiveFile<'_>) -> String {
        format!(
            "http://{}:{}/{}/{}/{SITE}_sp{}_{}_{}_{}.{}",
            self.host,
            self.http_port,
            file.serve,
            file.kind,
            file.spid,
            file.slug,
            file.date.format(ARCHIVE_DATE_FORMAT),
            file.hour,
            file.ext,
        )
    }

    /// Signed links for every window hour the inventory reports, in window
    /// order. Hours outside the window are ignored.
    pub fn archive_entries(
        &self,
        spid: &str,
        slug: &str,
        date: NaiveDate,
        available: &[String],
        now: i64,
    ) -> Result<Vec<ArchiveEntry>, SigningError> {
        let signer = self.signer();
        let link = |serve: &str, kind: &str, hour: &str, ext: &str| {
            let url = self.archive_url(&ArchiveFile {
                serve,
                kind,
                spid,
                slug,
                date,
                hour,
                ext,
            });
            signer.sign_at(&url, now)
        };

        ARCHIVE_HOURS
            .iter()
            .filter(|hour| available.iter().any(|a| a == *hour))
            .map(|&hour| {
                Ok(ArchiveEntry {
                    label: hour.to_string(),
                    img: link("media", "img", hour, "jpg")?,
                    mp4: link("media", "rec", hour, "mp4")?,
                    download: link("download", "rec", hour, "mp4")?,
                })
            })
            .collect()
    }
}

/// Components of one archive file path.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveFile<'a> {
    /// `media` for viewing, `download` for attachment downloads.
    pub serve: &'a str,
    /// `img` or `rec`.
    pub kind: &'a str,
    pub spid: &'a str,
    pub slug: &'a str,
    pub date: NaiveDate,
    pub hour: &'a str,
    pub ext: &'a str,
}

/// Signed links for one archived hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub label: String,
    pub img: String,
    pub mp4: String,
    pub download: String,
}

/// Convert a `DD.MM.YYYY` record date to the ISO form used in inventory
/// paths. An empty or missing value means `today`.
pub fn format_rec_date(rec_date: Option<&str>, today: NaiveDate) -> Option<String> {
    match rec_date.map(str::trim) {
        None | Some("") => Some(today.to_string()),
        Some(value) => parse_display_date(value).map(|d| d.to_string()),
    }
}

/// Parse a `DD-MM-YYYY` date as reported by the inventory.
pub fn parse_archive_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ARCHIVE_DATE_FORMAT).ok()
}

/// The last [`ARCHIVE_MAX_DAYS`] days, newest first, `today` included.
pub fn fallback_archive_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..ARCHIVE_MAX_DAYS)
        .map(|days| today - Duration::days(days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MediaServerConfig {
        MediaServerConfig {
            host: "media.local".into(),
            http_port: 8080,
            rtmp_port: 1935,
            secret: "secret".into(),
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 1, 16).unwrap()
    }

    #[test]
    fn api_url_uses_http_port() {
        assert_eq!(config().api_url(), "http://media.local:8080/api");
    }

    #[test]
    fn live_stream_url_is_signed_without_expiration() {
        let url = config().live_stream_url("100", "kamera-2").unwrap();
        assert!(url.starts_with("rtmp://media.local:1935/kam/kam_sp100_kamera-2?st="));
        assert!(url.ends_with("&e="));
    }

    #[test]
    fn archive_url_layout() {
        let url = config().archive_url(&ArchiveFile {
            serve: "download",
            kind: "rec",
            spid: "100",
            slug: "kamera-2",
            date: day(),
            hour: "08:00",
            ext: "mp4",
        });
        assert_eq!(
            url,
            "http://media.local:8080/download/rec/kam_sp100_kamera-2_16-01-2015_08:00.mp4"
        );
    }

    #[test]
    fn archive_entries_follow_window_order() {
        let available = vec!["20:00".to_string(), "07:00".to_string(), "09:00".to_string()];
        let entries = config()
            .archive_entries("100", "kamera-2", day(), &available, 1_421_366_400)
            .unwrap();

        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["09:00", "20:00"]);

        let first = &entries[0];
        assert!(first.img.contains("/media/img/kam_sp100_kamera-2_16-01-2015_09:00.jpg?st="));
        assert!(first.mp4.contains("/media/rec/kam_sp100_kamera-2_16-01-2015_09:00.mp4?st="));
        assert!(first
            .download
            .contains("/download/rec/kam_sp100_kamera-2_16-01-2015_09:00.mp4?st="));
        assert!(config().signer().verify_at(&first.mp4, 1_421_366_400));
    }

    #[test]
    fn no_inventory_hours_means_no_entries() {
        let entries = config()
            .archive_entries("100", "cam", day(), &[], 0)
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn rec_date_conversion() {
        assert_eq!(format_rec_date(Some("16.01.2015"), day()), Some("2015-01-16".into()));
        assert_eq!(format_rec_date(None, day()), Some("2015-01-16".into()));
        assert_eq!(format_rec_date(Some(""), day()), Some("2015-01-16".into()));
        assert_eq!(format_rec_date(Some("2015-01-16"), day()), None);
    }

    #[test]
    fn inventory_dates_use_dashes() {
        assert_eq!(parse_archive_date("16-01-2015"), Some(day()));
        assert_eq!(parse_archive_date("16.01.2015"), None);
    }

    #[test]
    fn fallback_covers_ninety_days_including_today() {
        let dates = fallback_archive_dates(day());
        assert_eq!(dates.len(), 90);
        assert_eq!(dates[0], day());
        assert_eq!(dates[89], day() - Duration::days(89));
    }
}
