//! Error types for the bodycomp ingestion engine.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors (ledger, snapshot, data directory)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Snapshot at {path:?} is corrupt: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure to parse a single source file. Always recovered at batch level.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing timestamp column '{column}'")]
    MissingTimestampColumn { column: String },

    #[error("row {row}: unparseable timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("row {row}: malformed row: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("malformed header: {0}")]
    MalformedHeader(String),
}

/// Errors surfaced by the pipeline and the CLI.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No valid data found. Add CSV files to {data_dir:?}.")]
    NoDataAvailable {
        data_dir: PathBuf,
        /// `file: reason` for every source that failed during the run.
        failures: Vec<String>,
    },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for IngestError {
    fn from(err: config::ConfigError) -> Self {
        IngestError::ConfigError(err.to_string())
    }
}
