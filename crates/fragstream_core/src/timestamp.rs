//! Timestamp formatting and fragment file naming.
//!
//! Fragment files are named by the event time of the first record they
//! contain, rendered in a fixed-width RFC 3339 form so that
//! lexicographic file-name order equals chronological order:
//!
//! ```text
//! 2024-01-01T00:00:00.000Z.dat
//! 2024-01-01T06:30:15.250Z.dat
//! ```

use chrono::{DateTime, TimeZone, Utc};

/// Fixed-width render of a UTC timestamp: millisecond precision, `Z` suffix.
const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Formats a timestamp in the canonical fixed-width form.
#[must_use]
pub fn format_ts(ts: DateTime<Utc>) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Parses an RFC 3339 timestamp, normalizing any offset to UTC.
///
/// Returns `None` for anything that is not a well-formed timestamp.
#[must_use]
pub fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Truncates a timestamp to the millisecond precision used in fragment
/// names, so that a formatted-then-parsed timestamp compares equal.
#[must_use]
pub fn truncate_ms(ts: DateTime<Utc>) -> DateTime<Utc> {
    match Utc.timestamp_millis_opt(ts.timestamp_millis()).single() {
        Some(t) => t,
        None => ts,
    }
}

/// Builds a fragment file name from a timestamp and extension.
#[must_use]
pub fn fragment_file_name(ts: DateTime<Utc>, ext: &str) -> String {
    format!("{}.{}", format_ts(ts), ext)
}

/// Recovers the timestamp from a fragment file name.
///
/// Returns `None` when the extension does not match or the stem is not a
/// well-formed timestamp.
#[must_use]
pub fn parse_fragment_file_name(name: &str, ext: &str) -> Option<DateTime<Utc>> {
    let stem = name
        .strip_suffix(ext)
        .and_then(|s| s.strip_suffix('.'))?;
    parse_ts(stem)
}
