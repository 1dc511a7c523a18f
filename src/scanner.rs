//! Source Scanner
//!
//! Lists the candidate input files of the data directory and classifies each
//! against the ledger. Only the top level of the directory is considered.

use crate::error::StorageError;
use crate::ledger::Ledger;
use crate::types::{Mtime, SourceFile, SourceStatus};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Scanner over one data directory.
pub struct SourceScanner {
    root: PathBuf,
    extension: String,
}

impl SourceScanner {
    /// `extension` is matched ASCII case-insensitively, with or without a leading dot.
    pub fn new<P: Into<PathBuf>>(root: P, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate matching files sorted by identifier, each marked
    /// `Unchanged` or `Pending` relative to `ledger`.
    pub fn scan(&self, ledger: &Ledger) -> Result<Vec<SourceFile>, StorageError> {
        if !self.root.exists() {
            warn!(dir = %self.root.display(), "Data directory does not exist");
            return Ok(Vec::new());
        }
        if !self.root.is_dir() {
            return Err(StorageError::InvalidPath(format!(
                "Data path {:?} is not a directory",
                self.root
            )));
        }

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        let mut sources = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Depth 0 is the root itself; nothing can be listed.
                Err(e) if e.depth() == 0 => {
                    return Err(StorageError::IoError(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        format!("Failed to read data directory: {}", e),
                    )));
                }
                Err(e) => {
                    warn!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable directory entry"
                    );
                    continue;
                }
            };

            if !self.matches_extension(entry.path()) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping source without metadata");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                warn!(path = %entry.path().display(), "Skipping file with non UTF-8 name");
                continue;
            };
            let id: String = name.nfc().collect();

            let mtime = match metadata.modified() {
                Ok(modified) => Mtime::from_system_time(modified),
                Err(e) => {
                    warn!(file = %id, error = %e, "Skipping source without modification time");
                    continue;
                }
            };
            let status = if ledger.is_current(&id, mtime) {
                SourceStatus::Unchanged
            } else {
                SourceStatus::Pending
            };
            debug!(file = %id, mtime = %mtime, status = %status, "Scanned source");

            sources.push(SourceFile {
                id,
                path: entry.path().to_path_buf(),
                mtime,
                status,
            });
        }

        sources.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sources)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}
