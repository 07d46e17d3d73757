//! Aggregation passes over an ingested entry collection.
//!
//! Each aggregator owns its accumulator, reads entries by shared reference
//! and produces one report section. They share no state, so they can run in
//! any order or concurrently.
//!
//! - [`operations`] - Operation, service and identity frequencies plus latency statistics
//! - [`security`] - Failure, doctrine-violation and suspicious-operation counts
//! - [`performance`] - Hourly volume histogram, per-service volume and peak hour
//! - [`stats`] - Frequency tables and percentile helpers

pub mod operations;
pub mod performance;
pub mod security;
pub mod stats;

use crate::audit::types::AuditEntry;

/// A single-pass computation producing one report section.
pub trait Aggregator: Default {
    type Output;

    /// Fold one entry into the accumulator.
    fn observe(&mut self, entry: &AuditEntry);

    /// Produce the section.
    fn finish(self) -> Self::Output;

    /// Run the aggregator over a whole collection.
    fn aggregate(entries: &[AuditEntry]) -> Self::Output {
        let mut aggregator = Self::default();
        for entry in entries {
            aggregator.observe(entry);
        }
        aggregator.finish()
    }
}
