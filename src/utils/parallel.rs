//! Parallel source processing utilities.
//!
//! Sources are scanned concurrently with Rayon. Results come back in the
//! same order as the input slice, so merging them stays deterministic no
//! matter how the work was scheduled.

use crate::utils::progress::ProgressBar;
use crate::utils::reader::AuditSource;
use rayon::prelude::*;

/// Process every source in parallel and return results in input order.
///
/// # Arguments
/// * `sources` - Sources to scan, already in the order results should appear
/// * `progress` - Bar advanced once per finished source
/// * `processor` - Function that scans a single source
pub fn process_sources_parallel<T, F>(
    sources: &[AuditSource],
    progress: &ProgressBar,
    processor: F,
) -> Vec<T>
where
    T: Send,
    F: Fn(&AuditSource) -> T + Send + Sync,
{
    sources
        .par_iter()
        .map(|source| {
            let result = processor(source);
            progress.inc();
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    #[test]
    fn test_results_keep_input_order() {
        let sources: Vec<AuditSource> = (0..16)
            .map(|i| AuditSource::from_text(format!("source-{i:02}"), "x\n".repeat(i + 1)))
            .collect();
        let progress = ProgressBar::hidden();

        let results = process_sources_parallel(&sources, &progress, |source| {
            let lines = source.open().map(|reader| reader.lines().count()).unwrap_or(0);
            (source.id().to_string(), lines)
        });

        assert_eq!(results.len(), 16);
        assert_eq!(progress.position(), 16);
        for (i, (id, lines)) in results.iter().enumerate() {
            assert_eq!(id, &format!("source-{i:02}"));
            assert_eq!(*lines, i + 1);
        }
    }

    #[test]
    fn test_no_sources() {
        let progress = ProgressBar::hidden();
        let results = process_sources_parallel(&[], &progress, |_| 0usize);
        assert!(results.is_empty());
    }
}
