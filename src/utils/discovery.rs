//! Audit file discovery.
//!
//! BLUX writes one JSONL file per rotation period into a single directory,
//! optionally compressed once rotated out.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name suffixes recognised as audit trails.
pub const AUDIT_FILE_SUFFIXES: [&str; 3] = [".jsonl", ".jsonl.gz", ".jsonl.zst"];

/// Default location of the audit trail directory, relative to the home directory.
pub const DEFAULT_AUDIT_PATH: &str = "~/.config/blux/audit/";

/// Expand a leading `~` to the current user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// True when the file name carries one of the [`AUDIT_FILE_SUFFIXES`].
pub fn is_audit_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| AUDIT_FILE_SUFFIXES.iter().any(|s| name.ends_with(s)))
}

/// Find the audit files under `path`, sorted by path.
///
/// A file path is returned as the only source regardless of its name. For a
/// directory only its immediate children are considered. A missing path is
/// logged and yields no files.
pub fn find_audit_files(path: &Path) -> Vec<PathBuf> {
    if !path.exists() {
        warn!("Audit path not found: {}", path.display());
        return Vec::new();
    }

    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_audit_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort();
    debug!("Found {} audit files in {}", files.len(), path.display());
    files
}
