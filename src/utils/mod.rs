//! Ingestion pipeline and shared helpers.
//!
//! - [`processor`] - The ingestion pipeline: sources in, entries and failures out
//! - [`parallel`] - Order-preserving parallel scan of sources
//! - [`reader`] - Audit sources with automatic decompression
//! - [`discovery`] - Locating audit files on disk
//! - [`time`] - Timestamp parsing, hour buckets and time windows
//! - [`progress`] - Progress bar for long ingestion runs
//! - [`format`] - Number formatting for the text report
//!
//! # Examples
//!
//! ```
//! use blux_audit_tools::utils::processor::IngestPipeline;
//! use blux_audit_tools::utils::reader::AuditSource;
//!
//! let text = "{\"operation\":\"login\"}\nnot json\n";
//! let ingestion = IngestPipeline::new().ingest(vec![AuditSource::from_text("inline", text)]);
//!
//! assert_eq!(ingestion.entries.len(), 1);
//! assert_eq!(ingestion.failures.len(), 1);
//! ```

pub mod discovery;
pub mod format;
pub mod parallel;
pub mod processor;
pub mod progress;
pub mod reader;
pub mod time;
