// src/tracker/timestamp.rs

//! Event time derivation for CSV rows.
//!
//! Rows are never rejected for lacking a usable time: anything that cannot be
//! parsed is stamped with the ingestion time instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

use crate::tracker::reader::Fields;

/// Column names checked for an event time, in priority order.
pub const TIMESTAMP_FIELDS: [&str; 6] = [
    "timestamp",
    "time",
    "datetime",
    "date",
    "created_at",
    "updated_at",
];

#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// Date and time without zone, read as UTC.
    DateTime(&'static str),
    /// RFC 3339 with an explicit numeric offset.
    Rfc3339,
    /// Date only, read as midnight UTC.
    Date(&'static str),
}

/// Accepted layouts, tried in order; the first match wins.
const PATTERNS: [Pattern; 9] = [
    Pattern::DateTime("%Y-%m-%d %H:%M:%S"),
    Pattern::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S"),
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    Pattern::DateTime("%Y-%m-%dT%H:%M:%S%.fZ"),
    Pattern::Rfc3339,
    Pattern::Date("%Y-%m-%d"),
    Pattern::DateTime("%m/%d/%Y %H:%M:%S"),
    Pattern::DateTime("%d/%m/%Y %H:%M:%S"),
];

/// Derive the event time of a row, falling back to the current time.
pub fn derive_timestamp(fields: &Fields) -> f64 {
    derive_timestamp_or(fields, now_epoch)
}

/// Like [`derive_timestamp`] with an explicit fallback clock.
pub fn derive_timestamp_or(fields: &Fields, fallback: impl FnOnce() -> f64) -> f64 {
    match candidate_value(fields).and_then(parse_timestamp) {
        Some(ts) => ts,
        None => fallback(),
    }
}

/// The first candidate field that is present and not blank.
///
/// Only this field is parsed; later candidates are not consulted even if it
/// turns out to be unparseable.
pub fn candidate_value(fields: &Fields) -> Option<&str> {
    TIMESTAMP_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

/// Parse a timestamp string into fractional Unix seconds.
///
/// Tries every known layout, then a raw numeric epoch value.
pub fn parse_timestamp(value: &str) -> Option<f64> {
    let value = value.trim();

    for pattern in PATTERNS {
        if let Some(ts) = parse_with(pattern, value) {
            trace!(value, ?pattern, "parsed timestamp");
            return Some(ts);
        }
    }

    value.parse::<f64>().ok().filter(|ts| ts.is_finite())
}

fn parse_with(pattern: Pattern, value: &str) -> Option<f64> {
    match pattern {
        Pattern::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt)
            .ok()
            .map(|naive| epoch_seconds(naive.and_utc())),
        Pattern::Rfc3339 => DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| epoch_seconds(dt.with_timezone(&Utc))),
        Pattern::Date(fmt) => NaiveDate::parse_from_str(value, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| epoch_seconds(naive.and_utc())),
    }
}

fn epoch_seconds(dt: DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9
}

/// Current wall-clock time as fractional Unix seconds.
pub fn now_epoch() -> f64 {
    epoch_seconds(Utc::now())
}
