//! Data structures representing BLUX audit trail entries.
//!
//! Audit trails are loosely typed: every field is optional on the wire. The
//! defaulting rules are applied once, when a line is parsed, so aggregators
//! can read plain fields instead of probing a JSON map.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::utils::time::parse_timestamp;

/// Value substituted for `operation`, `service` and `identity` when absent.
pub const UNKNOWN: &str = "unknown";

/// `status` value that marks a failed operation.
pub const FAILURE_STATUS: &str = "failure";

/// Doctrine flag attached by the policy engine when validation failed.
pub const VALIDATION_FAILED_FLAG: &str = "validation_failed";

/// One audit record.
///
/// # Fields
///
/// - `timestamp`: UTC time of the event, `None` when missing or unparsable
/// - `operation`, `service`, `identity`: free-form identifiers, [`UNKNOWN`] when absent
/// - `status`: outcome indicator such as `"success"` or `"failure"`
/// - `duration_ms`: latency sample, `None` unless a finite non-negative number
/// - `doctrine_flags_applied`: policy flags attached upstream
/// - `raw`: the original JSON object, kept for verbatim reporting
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub operation: String,
    pub service: String,
    pub identity: String,
    pub status: Option<String>,
    pub duration_ms: Option<f64>,
    pub doctrine_flags_applied: Vec<String>,
    pub raw: Map<String, Value>,
}

impl AuditEntry {
    /// Build an entry from a decoded JSON object, applying the field defaults.
    pub fn from_object(raw: Map<String, Value>) -> Self {
        let timestamp = match raw.get("timestamp") {
            Some(Value::String(ts)) => parse_timestamp(ts).ok(),
            _ => None,
        };

        let duration_ms = raw
            .get("duration_ms")
            .and_then(Value::as_f64)
            .filter(|ms| ms.is_finite() && *ms >= 0.0);

        let doctrine_flags_applied = match raw.get("doctrine_flags_applied") {
            Some(Value::Array(flags)) => flags
                .iter()
                .filter_map(|flag| flag.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        Self {
            timestamp,
            operation: text_field(&raw, "operation").unwrap_or_else(|| UNKNOWN.to_string()),
            service: text_field(&raw, "service").unwrap_or_else(|| UNKNOWN.to_string()),
            identity: text_field(&raw, "identity").unwrap_or_else(|| UNKNOWN.to_string()),
            status: text_field(&raw, "status"),
            duration_ms,
            doctrine_flags_applied,
            raw,
        }
    }

    /// True when the entry's `status` is the failure sentinel.
    pub fn is_failure(&self) -> bool {
        self.status.as_deref() == Some(FAILURE_STATUS)
    }

    /// True when the policy engine flagged this entry as failing validation.
    pub fn has_doctrine_flag(&self, flag: &str) -> bool {
        self.doctrine_flags_applied.iter().any(|f| f == flag)
    }

    /// The original JSON object as a value.
    pub fn raw_value(&self) -> Value {
        Value::Object(self.raw.clone())
    }
}

/// Read a field as text. Strings are taken as-is, `null` counts as absent and
/// any other JSON value is rendered compactly.
fn text_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A line that could not be turned into an [`AuditEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    /// Identifier of the source the line came from
    pub source: String,
    /// 1-based line number within the source
    pub line_number: usize,
    pub reason: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} - {}", self.source, self.line_number, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn entry_from(value: Value) -> AuditEntry {
        match value {
            Value::Object(map) => AuditEntry::from_object(map),
            other => panic!("test fixture must be an object, got {other}"),
        }
    }

    #[test]
    fn test_full_entry() {
        let entry = entry_from(json!({
            "timestamp": "2025-10-07T12:34:56Z",
            "operation": "login",
            "service": "auth-gateway",
            "identity": "alice",
            "status": "success",
            "duration_ms": 12.5,
            "doctrine_flags_applied": ["pii_redacted", "validation_failed"]
        }));

        let ts = entry.timestamp.unwrap();
        assert_eq!(ts.year(), 2025);
        assert_eq!(ts.hour(), 12);
        assert_eq!(entry.operation, "login");
        assert_eq!(entry.service, "auth-gateway");
        assert_eq!(entry.identity, "alice");
        assert_eq!(entry.status.as_deref(), Some("success"));
        assert_eq!(entry.duration_ms, Some(12.5));
        assert!(entry.has_doctrine_flag(VALIDATION_FAILED_FLAG));
        assert!(!entry.is_failure());
    }

    #[test]
    fn test_defaults_for_empty_object() {
        let entry = entry_from(json!({}));
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.operation, UNKNOWN);
        assert_eq!(entry.service, UNKNOWN);
        assert_eq!(entry.identity, UNKNOWN);
        assert_eq!(entry.status, None);
        assert_eq!(entry.duration_ms, None);
        assert!(entry.doctrine_flags_applied.is_empty());
    }

    #[test]
    fn test_null_fields_are_absent() {
        let entry = entry_from(json!({"operation": null, "status": null}));
        assert_eq!(entry.operation, UNKNOWN);
        assert_eq!(entry.status, None);
    }

    #[test]
    fn test_non_string_identifiers_are_rendered() {
        let entry = entry_from(json!({"operation": 42, "identity": true}));
        assert_eq!(entry.operation, "42");
        assert_eq!(entry.identity, "true");
    }

    #[test]
    fn test_unparsable_timestamp_is_absent() {
        let entry = entry_from(json!({"timestamp": "yesterday", "operation": "read"}));
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.operation, "read");

        let entry = entry_from(json!({"timestamp": 1_700_000_000}));
        assert_eq!(entry.timestamp, None);
    }

    #[test]
    fn test_offset_timestamp_normalized_to_utc() {
        let entry = entry_from(json!({"timestamp": "2025-10-07T14:00:00+02:00"}));
        assert_eq!(entry.timestamp.unwrap().hour(), 12);
    }

    #[test]
    fn test_invalid_durations_are_absent() {
        for value in [json!(-1), json!("42"), json!(null), json!([1])] {
            let entry = entry_from(json!({"duration_ms": value}));
            assert_eq!(entry.duration_ms, None);
        }
        let entry = entry_from(json!({"duration_ms": 42}));
        assert_eq!(entry.duration_ms, Some(42.0));
    }

    #[test]
    fn test_doctrine_flags_skip_non_strings() {
        let entry = entry_from(json!({"doctrine_flags_applied": ["a", 1, null, "b"]}));
        assert_eq!(entry.doctrine_flags_applied, vec!["a", "b"]);

        let entry = entry_from(json!({"doctrine_flags_applied": "validation_failed"}));
        assert!(entry.doctrine_flags_applied.is_empty());
    }

    #[test]
    fn test_failure_status() {
        let entry = entry_from(json!({"status": "failure"}));
        assert!(entry.is_failure());
        let entry = entry_from(json!({"status": "FAILURE"}));
        assert!(!entry.is_failure());
    }

    #[test]
    fn test_raw_is_preserved() {
        let value = json!({"operation": "login", "extra": {"nested": [1, 2]}});
        let entry = entry_from(value.clone());
        assert_eq!(entry.raw_value(), value);
    }

    #[test]
    fn test_parse_failure_display() {
        let failure = ParseFailure {
            source: "audit.jsonl".to_string(),
            line_number: 7,
            reason: "empty line".to_string(),
        };
        assert_eq!(failure.to_string(), "audit.jsonl:7 - empty line");
    }
}
