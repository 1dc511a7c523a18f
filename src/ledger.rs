//! Ledger Store
//!
//! Durable record of which source files have been ingested, keyed by file
//! name and holding the modification time seen when each file was last
//! parsed successfully. Persisted as a pretty-printed JSON object:
//!
//! ```json
//! {
//!   "2024-01.csv": 1712345678.123
//! }
//! ```
//!
//! Loading never fails. Anything other than a well-formed mapping (missing
//! file, unreadable bytes, the legacy list shape, or any other JSON value)
//! degrades to an empty ledger, so every source is simply re-ingested.

use crate::error::StorageError;
use crate::types::{Mtime, SourceId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Mapping from source identifier to last-processed modification time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: BTreeMap<SourceId, Mtime>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Mtime> {
        self.entries.get(id).copied()
    }

    pub fn record(&mut self, id: impl Into<SourceId>, mtime: Mtime) {
        self.entries.insert(id.into(), mtime);
    }

    /// True when the stored mtime for `id` equals `mtime` exactly.
    pub fn is_current(&self, id: &str, mtime: Mtime) -> bool {
        self.entries.get(id) == Some(&mtime)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceId, &Mtime)> {
        self.entries.iter()
    }
}

/// What `load` found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerShape {
    Absent,
    Mapping,
    Legacy,
    Corrupt,
}

impl std::fmt::Display for LedgerShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LedgerShape::Absent => "absent",
            LedgerShape::Mapping => "ok",
            LedgerShape::Legacy => "legacy (ignored)",
            LedgerShape::Corrupt => "corrupt (ignored)",
        };
        f.write_str(s)
    }
}

/// Persisted forms the ledger file may take.
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedLedger {
    Mapping(BTreeMap<SourceId, Mtime>),
    List(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

/// File-backed ledger persistence.
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger, degrading to empty on any problem.
    pub fn load(&self) -> Ledger {
        self.load_with_shape().0
    }

    /// Load the ledger and report which persisted shape was found.
    pub fn load_with_shape(&self) -> (Ledger, LedgerShape) {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No ledger on disk");
                return (Ledger::new(), LedgerShape::Absent);
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ledger unreadable, starting with empty history"
                );
                return (Ledger::new(), LedgerShape::Corrupt);
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return (Ledger::new(), LedgerShape::Absent);
        }

        match serde_json::from_slice::<PersistedLedger>(&bytes) {
            Ok(PersistedLedger::Mapping(entries)) => (Ledger { entries }, LedgerShape::Mapping),
            Ok(PersistedLedger::List(_)) => {
                warn!(
                    path = %self.path.display(),
                    "Ledger uses the legacy list format, starting with empty history"
                );
                (Ledger::new(), LedgerShape::Legacy)
            }
            Ok(PersistedLedger::Other(_)) => {
                warn!(
                    path = %self.path.display(),
                    "Ledger is not a file-to-mtime mapping, starting with empty history"
                );
                (Ledger::new(), LedgerShape::Corrupt)
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ledger is not valid JSON, starting with empty history"
                );
                (Ledger::new(), LedgerShape::Corrupt)
            }
        }
    }

    /// Persist the full ledger atomically (write to .tmp, then rename).
    pub fn save(&self, ledger: &Ledger) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let serialized = serde_json::to_string_pretty(&ledger.entries)
            .map_err(|e| StorageError::Serialization(format!("ledger: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serialized.as_bytes()).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to write ledger to {:?}: {}", temp_path, e),
            ))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file to {:?}: {}", self.path, e),
            ))
        })?;

        debug!(path = %self.path.display(), entries = ledger.len(), "Ledger saved");
        Ok(())
    }

    /// Remove the persisted ledger. Missing files are not an error.
    pub fn clear(&self) -> Result<bool, StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }
}
