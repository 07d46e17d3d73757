//! Core audit trail parsing and data structures.
//!
//! ## Key Components
//!
//! - [`types`] - The typed [`AuditEntry`](types::AuditEntry) and its field defaults
//! - [`parser`] - Per-line parsing into an entry or a [`ParseFailure`](types::ParseFailure)
//!
//! ## Example
//!
//! ```
//! use blux_audit_tools::audit::parser::parse_line;
//!
//! let entry = parse_line("inline", 1, r#"{"operation":"login","status":"success"}"#).unwrap();
//! assert_eq!(entry.operation, "login");
//! assert_eq!(entry.service, "unknown");
//!
//! let failure = parse_line("inline", 2, "not json").unwrap_err();
//! assert_eq!(failure.line_number, 2);
//! ```

pub mod parser;
pub mod types;
