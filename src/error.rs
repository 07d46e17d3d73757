//! Error taxonomy for the analytics engine.
//!
//! Only malformed caller input is a hard failure. Per-line problems are
//! reported as [`ParseFailure`](crate::audit::types::ParseFailure) values and
//! unreadable sources as [`SourceWarning`](crate::utils::processor::SourceWarning)s.

use thiserror::Error;

/// Errors produced by the library.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// The `--last` style window specifier could not be parsed.
    #[error("Invalid time window '{0}': expected an integer followed by 'h' (hours) or 'd' (days), e.g. 24h or 7d")]
    InvalidTimeWindow(String),

    /// The requested analysis scope is not one of the known scopes.
    #[error("Invalid analysis scope '{0}': expected one of operations, security, performance, all")]
    InvalidScope(String),

    /// An audit source could not be opened or read.
    #[error("Audit source unavailable: {source_id}: {source}")]
    SourceUnavailable {
        source_id: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
