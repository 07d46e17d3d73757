//! Audit sources with automatic decompression support.
//!
//! An [`AuditSource`] is anything the ingestion pipeline can read lines
//! from: a file on disk (plain, `.gz` or `.zst`) or text held in memory.
//!
//! # Examples
//!
//! ```no_run
//! use blux_audit_tools::utils::reader::AuditSource;
//! use std::io::BufRead;
//!
//! let source = AuditSource::file("audit/2025-10-07.jsonl.gz");
//! let reader = source.open().unwrap();
//! for line in reader.lines() {
//!     let line = line.unwrap();
//!     // Process line...
//! }
//! ```

use crate::error::{AnalyzerError, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    File(PathBuf),
    Text(String),
}

/// A named, line-oriented input to the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSource {
    id: String,
    origin: Origin,
}

impl AuditSource {
    /// A file source; its identifier is the path as given.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.display().to_string(),
            origin: Origin::File(path),
        }
    }

    /// An in-memory source holding newline-delimited JSON.
    pub fn from_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            origin: Origin::Text(text.into()),
        }
    }

    /// Identifier used in diagnostics and for ordering sources.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// On-disk size in bytes, when known.
    pub fn size_hint(&self) -> Option<u64> {
        match &self.origin {
            Origin::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            Origin::Text(text) => Some(text.len() as u64),
        }
    }

    /// Open the source for buffered line reading.
    pub fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        match &self.origin {
            Origin::File(path) => {
                let reader = open_file(path).map_err(|source| AnalyzerError::SourceUnavailable {
                    source_id: self.id.clone(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(reader)))
            }
            Origin::Text(text) => Ok(Box::new(Cursor::new(text.clone().into_bytes()))),
        }
    }
}

/// Opens a file with automatic decompression based on extension.
///
/// Detects file type by extension:
/// - `.gz` → Gzip decompression
/// - `.zst` → Zstandard decompression
/// - Otherwise → Plain file
pub fn open_file(path: impl AsRef<Path>) -> std::io::Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "gz" => Ok(Box::new(GzDecoder::new(file))),
        "zst" => Ok(Box::new(zstd::Decoder::new(file)?)),
        _ => Ok(Box::new(file)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_lines(source: &AuditSource) -> Vec<String> {
        source
            .open()
            .unwrap()
            .lines()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_plain_file() {
        let mut temp = NamedTempFile::with_suffix(".jsonl").unwrap();
        writeln!(temp, r#"{{"operation":"login"}}"#).unwrap();
        writeln!(temp, r#"{{"operation":"logout"}}"#).unwrap();
        temp.flush().unwrap();

        let source = AuditSource::file(temp.path());
        assert_eq!(source.id(), temp.path().display().to_string());
        let lines = read_lines(&source);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"operation":"login"}"#);
        assert_eq!(lines[1], r#"{"operation":"logout"}"#);
    }

    #[test]
    fn test_gzip_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = NamedTempFile::with_suffix(".jsonl.gz").unwrap();
        {
            let mut encoder = GzEncoder::new(&mut temp, Compression::default());
            writeln!(encoder, "compressed line 1").unwrap();
            writeln!(encoder, "compressed line 2").unwrap();
            encoder.finish().unwrap();
        }
        temp.flush().unwrap();

        let lines = read_lines(&AuditSource::file(temp.path()));
        assert_eq!(lines, vec!["compressed line 1", "compressed line 2"]);
    }

    #[test]
    fn test_zstd_file() {
        let mut temp = NamedTempFile::with_suffix(".jsonl.zst").unwrap();
        {
            let mut encoder = zstd::Encoder::new(&mut temp, 3).unwrap();
            writeln!(encoder, "zstd line 1").unwrap();
            writeln!(encoder, "zstd line 2").unwrap();
            encoder.finish().unwrap();
        }
        temp.flush().unwrap();

        let lines = read_lines(&AuditSource::file(temp.path()));
        assert_eq!(lines, vec!["zstd line 1", "zstd line 2"]);
    }

    #[test]
    fn test_text_source() {
        let source = AuditSource::from_text("inline", "a\nb\n");
        assert_eq!(source.id(), "inline");
        assert_eq!(source.size_hint(), Some(4));
        assert_eq!(read_lines(&source), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let source = AuditSource::file("/nonexistent/audit/trail.jsonl");
        assert_eq!(source.size_hint(), None);
        match source.open() {
            Err(AnalyzerError::SourceUnavailable { source_id, .. }) => {
                assert_eq!(source_id, "/nonexistent/audit/trail.jsonl");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opening a missing file should fail"),
        }
    }
}
