//! Date handling for BDT fields
//!
//! BDT dates are `DDMMYYYY`, times `HHMMSS`. Source values are ISO-8601
//! strings with or without offset, MySQL-style `YYYY-MM-DD HH:MM:SS`, bare
//! dates, or epoch milliseconds. The calendar date and wall-clock time
//! written in the value are used as-is, without timezone conversion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATETIME_OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses a loosely formatted date/time value
///
/// Returns `None` for anything that is not a recognisable date.
pub fn parse_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(text) => parse_datetime_str(text),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

/// String form of [`parse_datetime`]
pub fn parse_datetime_str(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.naive_local());
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Formats a value as `DDMMYYYY`, `None` if it is not a date
///
/// # Examples
///
/// ```
/// use bdt_export::core::normalize::format_date;
/// use serde_json::json;
///
/// assert_eq!(format_date(&json!("2024-11-12T09:30:00Z")).as_deref(), Some("12112024"));
/// assert_eq!(format_date(&json!("not a date")), None);
/// ```
pub fn format_date(value: &Value) -> Option<String> {
    parse_datetime(value).map(|dt| dt.format("%d%m%Y").to_string())
}

/// Formats a value as `HHMMSS`, `None` if it is not a date
pub fn format_time(value: &Value) -> Option<String> {
    parse_datetime(value).map(|dt| dt.format("%H%M%S").to_string())
}
