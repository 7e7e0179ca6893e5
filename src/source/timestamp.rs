use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

const NANOS_PER_SEC: u64 = 1_000_000_000;

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("time in unknown format: record has no eventTime")]
    Missing,

    #[error("time in unknown format: {value}")]
    ParseError {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("time out of range: {value}")]
    OutOfRange { value: String },
}

impl TimestampError {
    /// The raw `eventTime` value that could not be turned into a timestamp
    pub fn raw_value(&self) -> Option<&str> {
        match self {
            TimestampError::Missing => None,
            TimestampError::ParseError { value, .. } | TimestampError::OutOfRange { value } => {
                Some(value.as_str())
            }
        }
    }
}

/// Parse an RFC3339 string into a UTC datetime.
pub fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TimestampError::ParseError {
            value: value.to_string(),
            source: e,
        })
}

/// Derive the wire timestamp of a record from its `eventTime` field.
///
/// Returns whole seconds since the epoch multiplied by 1e9; any sub-second
/// precision in the source is dropped. Non-string values are reported with
/// their JSON text so the caller can see what was there.
pub fn event_time_nanos(record: &Value) -> Result<u64, TimestampError> {
    let raw = match record.get("eventTime") {
        None | Some(Value::Null) => return Err(TimestampError::Missing),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    let datetime = parse_rfc3339(&raw)?;
    let seconds = u64::try_from(datetime.timestamp())
        .map_err(|_| TimestampError::OutOfRange { value: raw.clone() })?;

    seconds
        .checked_mul(NANOS_PER_SEC)
        .ok_or(TimestampError::OutOfRange { value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rfc3339_utc() {
        let record = json!({"eventTime": "2023-01-01T00:00:00Z"});
        assert_eq!(event_time_nanos(&record).unwrap(), 1_672_531_200_000_000_000);
    }

    #[test]
    fn test_rfc3339_with_offset() {
        // 05:30 at +05:30 is midnight UTC
        let record = json!({"eventTime": "2023-01-01T05:30:00+05:30"});
        assert_eq!(event_time_nanos(&record).unwrap(), 1_672_531_200_000_000_000);
    }

    #[test]
    fn test_subsecond_precision_dropped() {
        let record = json!({"eventTime": "2023-01-01T00:00:00.987654Z"});
        assert_eq!(event_time_nanos(&record).unwrap(), 1_672_531_200_000_000_000);
    }

    #[test]
    fn test_missing_event_time() {
        let record = json!({"eventName": "GetObject"});
        assert!(matches!(
            event_time_nanos(&record),
            Err(TimestampError::Missing)
        ));
    }

    #[test]
    fn test_unparseable_event_time_keeps_raw_value() {
        let record = json!({"eventTime": "yesterday"});
        let err = event_time_nanos(&record).unwrap_err();
        assert_eq!(err.raw_value(), Some("yesterday"));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_non_string_event_time() {
        let record = json!({"eventTime": 1672531200});
        let err = event_time_nanos(&record).unwrap_err();
        assert_eq!(err.raw_value(), Some("1672531200"));
    }

    #[test]
    fn test_pre_epoch_is_out_of_range() {
        let record = json!({"eventTime": "1969-12-31T23:59:59Z"});
        assert!(matches!(
            event_time_nanos(&record),
            Err(TimestampError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_object_record() {
        assert!(matches!(
            event_time_nanos(&json!([1, 2, 3])),
            Err(TimestampError::Missing)
        ));
    }
}
