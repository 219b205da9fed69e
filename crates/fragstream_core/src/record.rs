//! Records and the record format boundary.
//!
//! The feed treats record payloads as opaque bytes. Interpreting them -
//! deriving the event time and producing the serialized text that goes
//! into fragments and responses - is the job of a [`RecordFormat`]
//! implementation supplied at feed construction.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};

/// A single incoming record: an opaque payload, immutable once ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The raw payload bytes.
    pub payload: Vec<u8>,
}

impl Record {
    /// Creates a record from raw bytes.
    #[must_use]
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Creates a record from a text payload.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            payload: text.into().into_bytes(),
        }
    }
}

/// Interprets opaque records for the feed.
///
/// Implementations must be deterministic: identical records produce
/// identical serialized forms and event times.
pub trait RecordFormat: Send + Sync {
    /// Extracts the event time carried by the record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedRecord`] if the record carries no
    /// recognizable event time.
    fn event_time(&self, record: &Record) -> CoreResult<DateTime<Utc>>;

    /// Serializes the record into the textual form stored in fragments
    /// and served in response bodies.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedRecord`] if the record cannot be
    /// serialized.
    fn serialize(&self, record: &Record) -> CoreResult<String>;

    /// Media type of the serialized form, used for `Content-Type`.
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }
}

/// Reference format: one UTF-8 line per record.
///
/// The payload is `<rfc3339-timestamp> <text>`; the leading token is the
/// event time. Serialization re-emits the payload with a trailing
/// newline. Anything else is a malformed record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineFormat;

impl LineFormat {
    /// Creates the line format.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn text<'a>(&self, record: &'a Record) -> CoreResult<&'a str> {
        std::str::from_utf8(&record.payload)
            .map_err(|_| CoreError::malformed_record("payload is not valid UTF-8"))
    }
}

impl RecordFormat for LineFormat {
    fn event_time(&self, record: &Record) -> CoreResult<DateTime<Utc>> {
        let text = self.text(record)?;
        let token = text
            .split_whitespace()
            .next()
            .ok_or_else(|| CoreError::malformed_record("empty payload"))?;
        crate::timestamp::parse_ts(token)
            .ok_or_else(|| CoreError::malformed_record(format!("no event time in {token:?}")))
    }

    fn serialize(&self, record: &Record) -> CoreResult<String> {
        let text = self.text(record)?;
        let mut line = text.trim_end_matches('\n').to_owned();
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_time_from_leading_token() {
        let format = LineFormat::new();
        let record = Record::from_text("2024-01-01T00:00:00Z hello");

        let ts = format.event_time(&record).unwrap();
        assert_eq!(crate::timestamp::format_ts(ts), "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn serialize_appends_single_newline() {
        let format = LineFormat::new();

        let plain = Record::from_text("2024-01-01T00:00:00Z hello");
        assert_eq!(
            format.serialize(&plain).unwrap(),
            "2024-01-01T00:00:00Z hello\n"
        );

        let newline = Record::from_text("2024-01-01T00:00:00Z hello\n");
        assert_eq!(
            format.serialize(&newline).unwrap(),
            "2024-01-01T00:00:00Z hello\n"
        );
    }

    #[test]
    fn malformed_records_rejected() {
        let format = LineFormat::new();

        let empty = Record::from_text("");
        assert!(matches!(
            format.event_time(&empty),
            Err(CoreError::MalformedRecord { .. })
        ));

        let no_time = Record::from_text("hello world");
        assert!(matches!(
            format.event_time(&no_time),
            Err(CoreError::MalformedRecord { .. })
        ));

        let not_utf8 = Record::new(vec![0xFF, 0xFE]);
        assert!(matches!(
            format.event_time(&not_utf8),
            Err(CoreError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn serialize_is_deterministic() {
        let format = LineFormat::new();
        let record = Record::from_text("2024-01-01T00:00:00Z hello");
        assert_eq!(
            format.serialize(&record).unwrap(),
            format.serialize(&record).unwrap()
        );
    }
}
