//! Volume over time and per service.

use super::stats::{FrequencyCounter, FrequencyTable};
use super::Aggregator;
use crate::audit::types::AuditEntry;
use crate::utils::time::hour_bucket;
use serde::Serialize;
use std::collections::BTreeMap;

/// The busiest hour bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakHour {
    pub hour: String,
    pub count: usize,
}

/// The performance section of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Entries per `YYYY-MM-DD HH:00` bucket, in chronological order.
    /// Only entries with a resolvable timestamp are counted.
    pub hourly_volume: BTreeMap<String, usize>,
    pub service_volume: FrequencyTable,
    /// Highest bucket; the earliest hour wins ties
    pub peak_hour: Option<PeakHour>,
}

#[derive(Debug, Default)]
pub struct PerformanceAggregator {
    hourly: BTreeMap<String, usize>,
    services: FrequencyCounter,
}

impl Aggregator for PerformanceAggregator {
    type Output = PerformanceReport;

    fn observe(&mut self, entry: &AuditEntry) {
        if let Some(ts) = &entry.timestamp {
            *self.hourly.entry(hour_bucket(ts)).or_insert(0) += 1;
        }
        self.services.observe(&entry.service);
    }

    fn finish(self) -> PerformanceReport {
        let peak_hour = peak_hour(&self.hourly);
        PerformanceReport {
            hourly_volume: self.hourly,
            service_volume: self.services.finish(),
            peak_hour,
        }
    }
}

/// The bucket with the highest count. Keys are visited in ascending order and
/// only a strictly higher count replaces the current best.
fn peak_hour(hourly: &BTreeMap<String, usize>) -> Option<PeakHour> {
    let mut best: Option<(&String, usize)> = None;
    for (hour, &count) in hourly {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((hour, count));
        }
    }
    best.map(|(hour, count)| PeakHour {
        hour: hour.clone(),
        count,
    })
}
