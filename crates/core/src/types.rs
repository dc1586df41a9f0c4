/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Display format for calendar dates in query parameters and responses.
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a `DD.MM.YYYY` date as used throughout the list API.
pub fn parse_display_date(value: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value.trim(), DISPLAY_DATE_FORMAT).ok()
}

/// Format a date as `DD.MM.YYYY`.
pub fn format_display_date(date: chrono::NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}
