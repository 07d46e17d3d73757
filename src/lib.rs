//! # BLUX Audit Tools
//!
//! Analytics over BLUX audit trails: append-only, newline-delimited JSON
//! records written by every service in a fleet.
//!
//! ## Overview
//!
//! An analysis run has three stages:
//!
//! 1. **Ingestion** - every line of every source is parsed on its own. Bad
//!    lines are recorded as [`ParseFailure`](audit::types::ParseFailure)s,
//!    unreadable sources as warnings, and an optional time window drops old
//!    entries. One bad line never aborts a run.
//! 2. **Aggregation** - three independent passes over the entry collection:
//!    operations (frequencies and latency percentiles), security (failures,
//!    doctrine violations, suspicious operations) and performance (hourly
//!    volume, per-service volume, peak hour).
//! 3. **Assembly** - the passes selected by a [`Scope`](report::Scope) are
//!    combined with ingestion metadata into an immutable
//!    [`Report`](report::Report).
//!
//! ## Features
//!
//! - **Tolerant parsing** - malformed lines are counted and reported, not fatal
//! - **Parallel ingestion** - sources are scanned concurrently, merged in a fixed order
//! - **Compressed trails** - `.jsonl.gz` and `.jsonl.zst` are read directly
//! - **Deterministic reports** - identical input yields byte-identical JSON
//!
//! ## Architecture
//!
//! - [`audit`] - Entry model and per-line parser
//! - [`utils`] - Ingestion pipeline, sources, discovery and time handling
//! - [`analysis`] - The three aggregators and shared statistics
//! - [`report`] - Scope selection and report assembly
//! - [`commands`] - The `blux-audit` command implementations
//! - [`error`] - Error taxonomy
//!
//! ## Example
//!
//! ```
//! use blux_audit_tools::report::{assemble, Scope};
//! use blux_audit_tools::utils::processor::IngestPipeline;
//! use blux_audit_tools::utils::reader::AuditSource;
//!
//! let trail = concat!(
//!     r#"{"timestamp":"2025-10-07T10:00:00Z","operation":"login","status":"success"}"#, "\n",
//!     r#"{"timestamp":"2025-10-07T10:05:00Z","operation":"login_failed","status":"failure"}"#, "\n",
//! );
//! let ingestion = IngestPipeline::new().ingest(vec![AuditSource::from_text("inline", trail)]);
//! let report = assemble(&ingestion.entries, Scope::All);
//!
//! assert_eq!(report.metadata.total_entries, 2);
//! assert_eq!(report.security.unwrap().failed_operations, 1);
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! blux-audit analyze --last 7d --type security --format json
//! ```

pub mod analysis;
pub mod audit;
pub mod commands;
pub mod error;
pub mod report;
pub mod utils;
