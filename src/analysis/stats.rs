//! Counting and summary statistics shared by the aggregators.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

/// Minimum number of latency samples before a 95th percentile is reported.
pub const P95_MIN_SAMPLES: usize = 20;

/// Occurrence counts ordered by descending count.
///
/// Keys with equal counts keep the order in which they were first seen, so
/// the table is fully determined by its input sequence. Serialises as a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn from_keys<'a, I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counter = FrequencyCounter::default();
        for key in keys {
            counter.observe(key);
        }
        counter.finish()
    }

    /// Keep only the `n` most frequent keys.
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.counts.truncate(n);
        self
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, count)| (k.as_str(), *count))
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (key, count) in &self.counts {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Incremental builder for a [`FrequencyTable`].
#[derive(Debug, Default)]
pub struct FrequencyCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl FrequencyCounter {
    pub fn observe(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    pub fn finish(self) -> FrequencyTable {
        let mut counts = self.counts;
        // stable: ties stay in first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        FrequencyTable { counts }
    }
}

/// Latency summary over the entries that carry `duration_ms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTimeStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Zero until [`P95_MIN_SAMPLES`] samples are available
    pub p95: f64,
}

impl ResponseTimeStats {
    /// Summarise the samples, or `None` when there are none.
    pub fn from_samples(mut samples: Vec<f64>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        samples.sort_by(f64::total_cmp);

        let p95 = if samples.len() >= P95_MIN_SAMPLES {
            nearest_rank_percentile(&samples, 95.0)
        } else {
            0.0
        };

        Some(Self {
            count: samples.len(),
            mean: mean(&samples),
            median: median(&samples),
            p95,
        })
    }
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Median of a **sorted** slice, averaging the two middle values for even
/// lengths; `0.0` for an empty slice.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Nearest-rank percentile of a **sorted** slice.
///
/// Picks the sample at rank `ceil(p / 100 * n)` (1-based) without
/// interpolating. For 20 samples the 95th percentile is the 19th value.
pub fn nearest_rank_percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    // integer arithmetic keeps e.g. 95% of 20 at exactly rank 19
    let rank = if p.fract() == 0.0 && (0.0..=100.0).contains(&p) {
        (p as usize * n).div_ceil(100)
    } else {
        (p / 100.0 * n as f64).ceil() as usize
    };
    sorted[rank.clamp(1, n) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_table_orders_by_count_then_first_seen() {
        let table = FrequencyTable::from_keys(["b", "a", "c", "a", "c", "d"]);
        let ordered: Vec<_> = table.iter().collect();
        assert_eq!(ordered, vec![("a", 2), ("c", 2), ("b", 1), ("d", 1)]);
        assert_eq!(table.total(), 6);
        assert_eq!(table.get("c"), Some(2));
        assert_eq!(table.get("z"), None);
    }

    #[test]
    fn test_frequency_table_top() {
        let keys: Vec<String> = (0..15).map(|i| format!("user-{i}")).collect();
        let table = FrequencyTable::from_keys(keys.iter().map(String::as_str)).top(10);
        assert_eq!(table.len(), 10);
        assert_eq!(table.iter().next(), Some(("user-0", 1)));
        assert_eq!(table.iter().last(), Some(("user-9", 1)));
    }

    #[test]
    fn test_frequency_table_serializes_in_order() {
        let table = FrequencyTable::from_keys(["z", "a", "a"]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"a":2,"z":1}"#);

        let table = FrequencyTable::from_keys(["z", "a"]);
        assert_eq!(serde_json::to_string(&table).unwrap(), r#"{"z":1,"a":1}"#);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[5.0]), 5.0);
        assert_eq!(median(&[1.0, 2.0, 9.0]), 2.0);
        assert_eq!(median(&[1.0, 2.0, 4.0, 9.0]), 3.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_nearest_rank_percentile() {
        let samples: Vec<f64> = (1..=20).map(f64::from).collect();
        assert_eq!(nearest_rank_percentile(&samples, 95.0), 19.0);
        assert_eq!(nearest_rank_percentile(&samples, 50.0), 10.0);
        assert_eq!(nearest_rank_percentile(&samples, 100.0), 20.0);
        assert_eq!(nearest_rank_percentile(&samples, 0.0), 1.0);
        assert_eq!(nearest_rank_percentile(&[], 95.0), 0.0);

        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(nearest_rank_percentile(&samples, 95.0), 95.0);
        assert_eq!(nearest_rank_percentile(&samples, 99.5), 100.0);
    }

    #[test]
    fn test_p95_needs_twenty_samples() {
        let nineteen: Vec<f64> = (1..=19).map(|i| f64::from(i) * 10.0).collect();
        let stats = ResponseTimeStats::from_samples(nineteen).unwrap();
        assert_eq!(stats.count, 19);
        assert_eq!(stats.p95, 0.0);

        // unsorted input: 20 distinct values, descending
        let twenty: Vec<f64> = (1..=20).rev().map(|i| f64::from(i) * 10.0).collect();
        let stats = ResponseTimeStats::from_samples(twenty).unwrap();
        assert_eq!(stats.count, 20);
        assert_eq!(stats.p95, 190.0);
        assert_eq!(stats.median, 105.0);
        assert_eq!(stats.mean, 105.0);
    }

    #[test]
    fn test_no_samples() {
        assert_eq!(ResponseTimeStats::from_samples(Vec::new()), None);
    }
}
