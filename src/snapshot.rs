//! Snapshot Cache
//!
//! Binary cache of the canonical dataset so unchanged runs skip parsing.
//!
//! Layout: `BCSN` magic, 4-byte little-endian version, 32-byte blake3 digest
//! of the payload, then `bincode(Dataset)`.

use crate::error::StorageError;
use crate::types::Dataset;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SNAPSHOT_MAGIC: &[u8; 4] = b"BCSN";
const SNAPSHOT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 32;

/// Summary of the snapshot on disk, for status output.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInfo {
    pub bytes: u64,
    pub digest: String,
}

pub struct SnapshotCache {
    path: PathBuf,
}

impl SnapshotCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the cached dataset. `Ok(None)` when no snapshot has been written.
    pub fn load(&self) -> Result<Option<Dataset>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e)),
        };

        let payload = self.verified_payload(&bytes)?;
        let dataset: Dataset = bincode::deserialize(payload).map_err(|e| self.corrupt(e))?;
        debug!(
            path = %self.path.display(),
            records = dataset.len(),
            "Snapshot loaded"
        );
        Ok(Some(dataset))
    }

    /// Overwrite the snapshot atomically (write to .tmp, then rename).
    pub fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let payload = bincode::serialize(dataset)
            .map_err(|e| StorageError::Serialization(format!("snapshot: {}", e)))?;
        let digest = blake3::hash(&payload);

        let mut serialized = Vec::with_capacity(HEADER_LEN + payload.len());
        serialized.extend_from_slice(SNAPSHOT_MAGIC);
        serialized.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        serialized.extend_from_slice(digest.as_bytes());
        serialized.extend_from_slice(&payload);

        let temp_path = self.path.with_extension("bin.tmp");
        fs::write(&temp_path, &serialized).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to write snapshot to {:?}: {}", temp_path, e),
            ))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file to {:?}: {}", self.path, e),
            ))
        })?;

        debug!(
            path = %self.path.display(),
            records = dataset.len(),
            digest = %digest.to_hex(),
            "Snapshot saved"
        );
        Ok(())
    }

    /// Size and payload digest of the snapshot, if present and intact.
    pub fn info(&self) -> Result<Option<SnapshotInfo>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::IoError(e)),
        };
        self.verified_payload(&bytes)?;
        Ok(Some(SnapshotInfo {
            bytes: bytes.len() as u64,
            digest: hex::encode(&bytes[8..HEADER_LEN]),
        }))
    }

    /// Remove the snapshot. Missing files are not an error.
    pub fn clear(&self) -> Result<bool, StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn verified_payload<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8], StorageError> {
        if bytes.len() < HEADER_LEN {
            return Err(self.corrupt("file too short"));
        }
        if &bytes[0..4] != SNAPSHOT_MAGIC {
            return Err(self.corrupt("bad magic"));
        }
        let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if version != SNAPSHOT_VERSION {
            return Err(self.corrupt(format!("unsupported version {}", version)));
        }
        let payload = &bytes[HEADER_LEN..];
        if blake3::hash(payload).as_bytes()[..] != bytes[8..HEADER_LEN] {
            return Err(self.corrupt("digest mismatch"));
        }
        Ok(payload)
    }

    fn corrupt(&self, reason: impl std::fmt::Display) -> StorageError {
        StorageError::CorruptSnapshot {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
