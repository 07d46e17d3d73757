//! Operation patterns and frequencies.
//!
//! Counts every entry once per table, so each table's counts sum to the
//! number of entries analysed (the identity table is cut to the top users).

use super::stats::{FrequencyCounter, FrequencyTable, ResponseTimeStats};
use super::Aggregator;
use crate::audit::types::AuditEntry;
use serde::Serialize;

/// Number of identities kept in the `users` table.
pub const TOP_USERS: usize = 10;

/// The operations section of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationsReport {
    pub total_operations: usize,
    pub operations: FrequencyTable,
    pub services: FrequencyTable,
    /// The [`TOP_USERS`] most active identities
    pub users: FrequencyTable,
    /// Absent when no entry carried a latency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_times: Option<ResponseTimeStats>,
}

#[derive(Debug, Default)]
pub struct OperationsAggregator {
    total: usize,
    operations: FrequencyCounter,
    services: FrequencyCounter,
    users: FrequencyCounter,
    response_times: Vec<f64>,
}

impl Aggregator for OperationsAggregator {
    type Output = OperationsReport;

    fn observe(&mut self, entry: &AuditEntry) {
        self.total += 1;
        self.operations.observe(&entry.operation);
        self.services.observe(&entry.service);
        self.users.observe(&entry.identity);
        if let Some(ms) = entry.duration_ms {
            self.response_times.push(ms);
        }
    }

    fn finish(self) -> OperationsReport {
        OperationsReport {
            total_operations: self.total,
            operations: self.operations.finish(),
            services: self.services.finish(),
            users: self.users.finish().top(TOP_USERS),
            response_times: ResponseTimeStats::from_samples(self.response_times),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::parser::parse_line;

    fn entries(lines: &[&str]) -> Vec<AuditEntry> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| parse_line("test", i + 1, line).unwrap())
            .collect()
    }

    #[test]
    fn test_operation_counts() {
        let entries = entries(&[
            r#"{"operation":"login","service":"auth","identity":"alice","status":"success"}"#,
            r#"{"operation":"login_failed","service":"auth","identity":"bob","status":"failure"}"#,
            r#"{"operation":"logout","service":"web","identity":"alice","status":"success"}"#,
        ]);
        let report = OperationsAggregator::aggregate(&entries);

        assert_eq!(report.total_operations, 3);
        assert_eq!(report.operations.get("login"), Some(1));
        assert_eq!(report.operations.get("login_failed"), Some(1));
        assert_eq!(report.operations.get("logout"), Some(1));
        assert_eq!(report.operations.total(), 3);
        let services: Vec<_> = report.services.iter().collect();
        assert_eq!(services, vec![("auth", 2), ("web", 1)]);
        let users: Vec<_> = report.users.iter().collect();
        assert_eq!(users, vec![("alice", 2), ("bob", 1)]);
        assert_eq!(report.response_times, None);
    }

    #[test]
    fn test_missing_fields_count_as_unknown() {
        let entries = entries(&[r#"{}"#, r#"{"operation":"read"}"#]);
        let report = OperationsAggregator::aggregate(&entries);

        assert_eq!(report.operations.get("unknown"), Some(1));
        assert_eq!(report.services.get("unknown"), Some(2));
        assert_eq!(report.users.get("unknown"), Some(2));
    }

    #[test]
    fn test_users_truncated_to_top_ten() {
        let lines: Vec<String> = (0..12)
            .flat_map(|i| {
                // user-11 is the busiest, then every other user once
                let repeats = if i == 11 { 3 } else { 1 };
                (0..repeats).map(move |_| format!(r#"{{"identity":"user-{i}"}}"#))
            })
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let report = OperationsAggregator::aggregate(&entries(&refs));

        assert_eq!(report.users.len(), TOP_USERS);
        assert_eq!(report.users.iter().next(), Some(("user-11", 3)));
        assert_eq!(report.users.get("user-8"), Some(1));
        assert_eq!(report.users.get("user-9"), None);
        assert_eq!(report.total_operations, 14);
    }

    #[test]
    fn test_response_times_skip_entries_without_duration() {
        let entries = entries(&[r#"{"operation":"a"}"#, r#"{"operation":"b","duration_ms":42}"#]);
        let report = OperationsAggregator::aggregate(&entries);
        let rt = report.response_times.unwrap();

        assert_eq!(rt.count, 1);
        assert_eq!(rt.mean, 42.0);
        assert_eq!(rt.median, 42.0);
        assert_eq!(rt.p95, 0.0);
        assert_eq!(report.total_operations, 2);
    }

    #[test]
    fn test_empty_collection() {
        let report = OperationsAggregator::aggregate(&[]);
        assert_eq!(report.total_operations, 0);
        assert!(report.operations.is_empty());
        assert_eq!(report.response_times, None);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("response_times").is_none());
    }
}
