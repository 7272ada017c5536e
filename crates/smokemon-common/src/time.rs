//! Timestamp parsing for inbound payloads and CSV rows.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Naive layouts accepted after RFC 3339; all are interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Parse a timestamp string, returning `None` when no known layout matches.
///
/// # Examples
///
/// ```
/// use smokemon_common::time::parse_timestamp;
///
/// assert!(parse_timestamp("2023-09-20T12:00:00Z").is_some());
/// assert!(parse_timestamp("09/20/23 12:00:30").is_some());
/// assert!(parse_timestamp("not-a-date").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
