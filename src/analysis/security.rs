//! Security-related patterns.
//!
//! Suspicious-operation detection is a keyword heuristic: an entry qualifies
//! when its `operation` contains any of [`SUSPICIOUS_KEYWORDS`] (case
//! sensitive). It is meant to be reproducible, not precise.

use super::Aggregator;
use crate::audit::types::{AuditEntry, VALIDATION_FAILED_FLAG};
use serde::Serialize;
use serde_json::Value;

/// Substrings of `operation` that mark an entry as suspicious.
pub const SUSPICIOUS_KEYWORDS: [&str; 3] = ["unauthorized", "failed", "rejected"];

/// Number of suspicious entries reported verbatim.
pub const SUSPICIOUS_SAMPLE_LIMIT: usize = 10;

/// True when the operation name contains a suspicious keyword.
pub fn is_suspicious(operation: &str) -> bool {
    SUSPICIOUS_KEYWORDS.iter().any(|kw| operation.contains(kw))
}

/// The security section of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    pub failed_operations: usize,
    pub doctrine_violations: usize,
    pub suspicious_patterns_count: usize,
    /// The first [`SUSPICIOUS_SAMPLE_LIMIT`] suspicious entries, as ingested
    pub suspicious_patterns: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct SecurityAggregator {
    failed_operations: usize,
    doctrine_violations: usize,
    suspicious_count: usize,
    samples: Vec<Value>,
}

impl Aggregator for SecurityAggregator {
    type Output = SecurityReport;

    fn observe(&mut self, entry: &AuditEntry) {
        if entry.is_failure() {
            self.failed_operations += 1;
        }
        if entry.has_doctrine_flag(VALIDATION_FAILED_FLAG) {
            self.doctrine_violations += 1;
        }
        if is_suspicious(&entry.operation) {
            self.suspicious_count += 1;
            if self.samples.len() < SUSPICIOUS_SAMPLE_LIMIT {
                self.samples.push(entry.raw_value());
            }
        }
    }

    fn finish(self) -> SecurityReport {
        SecurityReport {
            failed_operations: self.failed_operations,
            doctrine_violations: self.doctrine_violations,
            suspicious_patterns_count: self.suspicious_count,
            suspicious_patterns: self.samples,
        }
    }
}
