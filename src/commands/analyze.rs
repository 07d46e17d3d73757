//! End-to-end audit trail analysis.
//!
//! Discovers the audit files under a path, ingests them (optionally limited
//! to a recent time window), assembles the report for the requested scope
//! and writes it as text or JSON.
//!
//! # Usage
//!
//! ```bash
//! # Everything in the default audit directory
//! blux-audit analyze
//!
//! # Security overview of the last day, as JSON
//! blux-audit analyze --last 24h --type security --format json
//!
//! # Rotated, compressed trails and a CSV of every count table
//! blux-audit analyze --audit-path /srv/blux/audit --export counts.csv
//! ```
//!
//! # Output
//!
//! The text format shows:
//! - Total entries and the time span they cover
//! - Top operations and response-time statistics
//! - Failed operations, doctrine violations and suspicious operations
//! - Peak hour and top services by volume
//!
//! Parse failures and unreadable files are logged as warnings on stderr and
//! never abort the run.

use crate::commands::export::export_csv;
use crate::report::{assemble, Report, Scope};
use crate::utils::discovery::{expand_home, find_audit_files};
use crate::utils::format::{format_millis, format_number};
use crate::utils::processor::{IngestPipeline, Ingestion};
use crate::utils::reader::AuditSource;
use crate::utils::time::{duration_human, format_timestamp, TimeWindow};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{info, warn};

/// Number of rows shown per table in the text report.
const TEXT_TOP_ROWS: usize = 5;

/// How the report is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Options for one `analyze` run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Directory holding the audit trails, or a single trail file
    pub audit_path: String,
    /// Look-back window such as `24h` or `7d`
    pub last: Option<String>,
    pub scope: Scope,
    pub format: OutputFormat,
    /// Write the report here instead of stdout
    pub output: Option<String>,
    /// Also write every count table to this CSV file
    pub export: Option<String>,
    pub show_progress: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            audit_path: crate::utils::discovery::DEFAULT_AUDIT_PATH.to_string(),
            last: None,
            scope: Scope::All,
            format: OutputFormat::Text,
            output: None,
            export: None,
            show_progress: true,
        }
    }
}

pub fn run(options: &AnalyzeOptions) -> Result<()> {
    // caller input is checked before touching any file
    let window = options
        .last
        .as_deref()
        .map(str::parse::<TimeWindow>)
        .transpose()?;

    let ingestion = load(options, window);
    if ingestion.entries.is_empty() {
        bail!("No audit entries found");
    }
    info!(
        "Loaded {} audit entries",
        format_number(ingestion.entries.len())
    );

    let report = assemble(&ingestion.entries, options.scope);

    match &options.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            let mut writer = BufWriter::new(file);
            write_report(&report, options.format, &mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write output file: {}", path))?;
            info!("Report written to {}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            write_report(&report, options.format, &mut writer)?;
        }
    }

    if let Some(path) = &options.export {
        export_csv(&report, path)?;
        info!("Count tables exported to {}", path);
    }

    Ok(())
}

fn load(options: &AnalyzeOptions, window: Option<TimeWindow>) -> Ingestion {
    let audit_path = expand_home(&options.audit_path);
    let sources: Vec<AuditSource> = find_audit_files(&audit_path)
        .into_iter()
        .map(AuditSource::file)
        .collect();

    if let Some(window) = window {
        info!("Limiting analysis to the last {}", window);
    }

    let ingestion = IngestPipeline::new()
        .with_window(window, Utc::now())
        .show_progress(options.show_progress)
        .ingest(sources);

    for warning in &ingestion.warnings {
        warn!("Source skipped: {}", warning);
    }
    ingestion.stats.report();

    ingestion
}

/// Write the report in the requested format.
pub fn write_report<W: Write>(report: &Report, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)
                .context("Failed to serialize report")?;
            writeln!(out)?;
        }
        OutputFormat::Text => render_text(report, Utc::now(), out)?,
    }
    Ok(())
}

/// Human-readable rendering of a report.
pub fn render_text<W: Write>(
    report: &Report,
    generated_at: DateTime<Utc>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "BLUX Audit Analysis Report")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Generated: {}", format_timestamp(&generated_at))?;
    writeln!(
        out,
        "Total entries: {}",
        format_number(report.metadata.total_entries)
    )?;

    let range = &report.metadata.time_range;
    if let (Some(start), Some(end)) = (range.start, range.end) {
        writeln!(
            out,
            "Time range: {} to {} ({})",
            format_timestamp(&start),
            format_timestamp(&end),
            duration_human(&start, &end)
        )?;
    }

    if let Some(ops) = &report.operations {
        writeln!(out, "\nOperations Analysis:")?;
        writeln!(
            out,
            "  Total operations: {}",
            format_number(ops.total_operations)
        )?;
        writeln!(out, "  Top operations:")?;
        for (op, count) in ops.operations.iter().take(TEXT_TOP_ROWS) {
            writeln!(out, "    {}: {}", op, format_number(count))?;
        }

        if let Some(rt) = &ops.response_times {
            writeln!(out, "  Response times (ms):")?;
            writeln!(
                out,
                "    Mean: {}, Median: {}, P95: {}",
                format_millis(rt.mean),
                format_millis(rt.median),
                format_millis(rt.p95)
            )?;
        }
    }

    if let Some(sec) = &report.security {
        writeln!(out, "\nSecurity Analysis:")?;
        writeln!(
            out,
            "  Failed operations: {}",
            format_number(sec.failed_operations)
        )?;
        writeln!(
            out,
            "  Doctrine violations: {}",
            format_number(sec.doctrine_violations)
        )?;
        writeln!(
            out,
            "  Suspicious patterns: {}",
            format_number(sec.suspicious_patterns_count)
        )?;
    }

    if let Some(perf) = &report.performance {
        writeln!(out, "\nPerformance Analysis:")?;
        match &perf.peak_hour {
            Some(peak) => writeln!(
                out,
                "  Peak hour: {} ({} operations)",
                peak.hour,
                format_number(peak.count)
            )?,
            None => writeln!(out, "  Peak hour: n/a (no timestamped entries)")?,
        }
        writeln!(out, "  Service distribution:")?;
        for (service, count) in perf.service_volume.iter().take(TEXT_TOP_ROWS) {
            writeln!(out, "    {}: {}", service, format_number(count))?;
        }
    }

    Ok(())
}
