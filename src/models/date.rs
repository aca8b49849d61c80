use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Chart and log label format, e.g. `08.01.2024`.
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y";

/// Parse either a calendar date (`2024-01-08`) or an RFC 3339 timestamp.
/// Timestamps are reduced to their UTC calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

/// The current UTC calendar date, the same clock `parse_date` reduces
/// timestamps with.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn format_display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Deserialize an optional date, treating empty strings as absent.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
        None => Ok(None),
    }
}
