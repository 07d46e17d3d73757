//! Audit trail ingestion.
//!
//! The pipeline turns a set of [`AuditSource`]s into one entry collection.
//! Every line is parsed independently: bad lines become [`ParseFailure`]s,
//! unreadable sources become [`SourceWarning`]s, and neither stops the run.
//!
//! Sources are ordered by identifier before scanning, scanned in parallel,
//! and merged back in that order, so the same inputs always produce the same
//! collection.

use crate::audit::parser::AuditLogReader;
use crate::audit::types::{AuditEntry, ParseFailure};
use crate::utils::format::format_number;
use crate::utils::parallel::process_sources_parallel;
use crate::utils::progress::ProgressBar;
use crate::utils::reader::AuditSource;
use crate::utils::time::TimeWindow;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info, warn};

/// A source that could not be read, in whole or in part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceWarning {
    pub source: String,
    pub message: String,
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Statistics collected during ingestion
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessStats {
    /// Total number of lines read across all sources
    pub total_lines: usize,
    /// Lines that parsed into an entry, including ones later filtered out
    pub parsed_entries: usize,
    /// Lines recorded as parse failures
    pub failed_lines: usize,
    /// Parsed entries dropped for being older than the time-window cutoff
    pub filtered_entries: usize,
    /// Sources that were opened successfully
    pub sources_processed: usize,
    /// Sources that could not be opened or failed mid-read
    pub sources_unavailable: usize,
}

impl ProcessStats {
    fn merge(&mut self, other: &ProcessStats) {
        self.total_lines += other.total_lines;
        self.parsed_entries += other.parsed_entries;
        self.failed_lines += other.failed_lines;
        self.filtered_entries += other.filtered_entries;
        self.sources_processed += other.sources_processed;
        self.sources_unavailable += other.sources_unavailable;
    }

    /// Log a summary of ingestion statistics
    pub fn report(&self) {
        info!(
            sources = self.sources_processed,
            unavailable = self.sources_unavailable,
            lines = self.total_lines,
            parsed = self.parsed_entries,
            filtered = self.filtered_entries,
            "Ingestion complete"
        );
        if self.failed_lines > 0 {
            let failed_percentage = (self.failed_lines as f64 / self.total_lines as f64) * 100.0;
            warn!(
                "Skipped {} unparsable lines ({:.2}%)",
                self.failed_lines, failed_percentage
            );
        }
    }
}

/// Everything one source produced.
#[derive(Debug, Default)]
pub struct SourceOutcome {
    pub entries: Vec<AuditEntry>,
    pub failures: Vec<ParseFailure>,
    pub warning: Option<SourceWarning>,
    pub stats: ProcessStats,
}

/// The merged result of an ingestion run.
#[derive(Debug, Default)]
pub struct Ingestion {
    pub entries: Vec<AuditEntry>,
    pub failures: Vec<ParseFailure>,
    pub warnings: Vec<SourceWarning>,
    pub stats: ProcessStats,
}

/// Reads audit sources into an entry collection.
#[derive(Debug, Clone, Default)]
pub struct IngestPipeline {
    cutoff: Option<DateTime<Utc>>,
    show_progress: bool,
}

impl IngestPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries whose timestamp is strictly older than `cutoff`.
    #[must_use]
    pub const fn with_cutoff(mut self, cutoff: Option<DateTime<Utc>>) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Keep only entries inside `window`, measured back from `now`.
    #[must_use]
    pub fn with_window(self, window: Option<TimeWindow>, now: DateTime<Utc>) -> Self {
        self.with_cutoff(window.map(|w| w.cutoff_from(now)))
    }

    /// Draw a progress bar on stderr while scanning.
    #[must_use]
    pub const fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Ingest all sources.
    ///
    /// Sources are sorted by identifier first; the output preserves line
    /// order within each source and that source order across them.
    pub fn ingest(&self, mut sources: Vec<AuditSource>) -> Ingestion {
        sources.sort_by(|a, b| a.id().cmp(b.id()));

        let progress = if self.show_progress {
            ProgressBar::new(sources.len(), "Loading")
        } else {
            ProgressBar::hidden()
        };

        let results =
            process_sources_parallel(&sources, &progress, |source| self.ingest_source(source));

        let mut ingestion = Ingestion::default();
        for outcome in results {
            ingestion.stats.merge(&outcome.stats);
            ingestion.entries.extend(outcome.entries);
            ingestion.failures.extend(outcome.failures);
            ingestion.warnings.extend(outcome.warning);
        }

        progress.finish_with_message(&format!(
            "Loaded {} entries",
            ingestion.entries.len()
        ));
        ingestion
    }

    /// Scan a single source.
    pub fn ingest_source(&self, source: &AuditSource) -> SourceOutcome {
        let mut outcome = SourceOutcome::default();

        let reader = match source.open() {
            Ok(reader) => reader,
            Err(e) => {
                warn!("{}", e);
                outcome.stats.sources_unavailable = 1;
                outcome.warning = Some(SourceWarning {
                    source: source.id().to_string(),
                    message: e.to_string(),
                });
                return outcome;
            }
        };

        match source.size_hint() {
            Some(bytes) => info!(
                "Loading: {} ({} bytes)",
                source.id(),
                format_number(usize::try_from(bytes).unwrap_or(usize::MAX))
            ),
            None => info!("Loading: {}", source.id()),
        }
        outcome.stats.sources_processed = 1;

        for line in AuditLogReader::new(source.id(), reader) {
            let parsed = match line {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(
                        "Read error in {} after {} lines: {}",
                        source.id(),
                        outcome.stats.total_lines,
                        e
                    );
                    outcome.stats.sources_unavailable = 1;
                    outcome.warning = Some(SourceWarning {
                        source: source.id().to_string(),
                        message: format!(
                            "read failed after {} lines: {}",
                            outcome.stats.total_lines, e
                        ),
                    });
                    break;
                }
            };

            outcome.stats.total_lines += 1;
            match parsed {
                Ok(entry) => {
                    outcome.stats.parsed_entries += 1;
                    if self.is_outside_window(&entry) {
                        outcome.stats.filtered_entries += 1;
                        continue;
                    }
                    outcome.entries.push(entry);
                }
                Err(failure) => {
                    warn!("Invalid entry in {}", failure);
                    outcome.stats.failed_lines += 1;
                    outcome.failures.push(failure);
                }
            }
        }

        debug!(
            "{}: {} lines, {} entries kept",
            source.id(),
            outcome.stats.total_lines,
            outcome.entries.len()
        );
        outcome
    }

    /// Entries without a resolvable timestamp always pass.
    fn is_outside_window(&self, entry: &AuditEntry) -> bool {
        match (self.cutoff, entry.timestamp) {
            (Some(cutoff), Some(ts)) => ts < cutoff,
            _ => false,
        }
    }
}
