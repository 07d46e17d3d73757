//! Report assembly.
//!
//! A [`Report`] combines ingestion metadata with the sections selected by a
//! [`Scope`]. It holds no wall-clock values, so assembling the same entries
//! twice serialises to identical bytes.

use crate::analysis::operations::{OperationsAggregator, OperationsReport};
use crate::analysis::performance::{PerformanceAggregator, PerformanceReport};
use crate::analysis::security::{SecurityAggregator, SecurityReport};
use crate::analysis::Aggregator;
use crate::audit::types::AuditEntry;
use crate::error::AnalyzerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which aggregators a run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Scope {
    Operations,
    Security,
    Performance,
    #[default]
    #[value(alias = "full")]
    All,
}

impl Scope {
    pub const fn includes_operations(self) -> bool {
        matches!(self, Self::Operations | Self::All)
    }

    pub const fn includes_security(self) -> bool {
        matches!(self, Self::Security | Self::All)
    }

    pub const fn includes_performance(self) -> bool {
        matches!(self, Self::Performance | Self::All)
    }
}

impl FromStr for Scope {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operations" => Ok(Self::Operations),
            "security" => Ok(Self::Security),
            "performance" => Ok(Self::Performance),
            "all" | "full" => Ok(Self::All),
            other => Err(AnalyzerError::InvalidScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Operations => "operations",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

/// Earliest and latest resolvable timestamps; both absent when none exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn of(entries: &[AuditEntry]) -> Self {
        let mut timestamps = entries.iter().filter_map(|e| e.timestamp);
        let Some(first) = timestamps.next() else {
            return Self::default();
        };
        let (start, end) = timestamps.fold((first, first), |(lo, hi), ts| {
            (lo.min(ts), hi.max(ts))
        });
        Self {
            start: Some(start),
            end: Some(end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMetadata {
    pub total_entries: usize,
    pub time_range: TimeRange,
}

/// The result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operations: Option<OperationsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceReport>,
}

/// Run the aggregators selected by `scope` and combine their sections.
///
/// The aggregators run concurrently on the rayon pool; each reads the shared
/// slice and returns its own section.
pub fn assemble(entries: &[AuditEntry], scope: Scope) -> Report {
    let (operations, (security, performance)) = rayon::join(
        || {
            scope
                .includes_operations()
                .then(|| OperationsAggregator::aggregate(entries))
        },
        || {
            rayon::join(
                || {
                    scope
                        .includes_security()
                        .then(|| SecurityAggregator::aggregate(entries))
                },
                || {
                    scope
                        .includes_performance()
                        .then(|| PerformanceAggregator::aggregate(entries))
                },
            )
        },
    );

    Report {
        metadata: ReportMetadata {
            total_entries: entries.len(),
            time_range: TimeRange::of(entries),
        },
        operations,
        security,
        performance,
    }
}
