//! Command implementations behind the `blux-audit` binary.
//!
//! - [`analyze`] - Ingest an audit directory and print the operations,
//!   security and performance report as text or JSON
//! - [`export`] - CSV export of the report's count tables

pub mod analyze;
pub mod export;
