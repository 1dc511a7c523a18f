//! Configuration System
//!
//! Layered configuration for data location, storage paths, analysis targets
//! and logging. Sources, lowest precedence first: built-in defaults, the
//! global config file, workspace config files, `BODYCOMP__*` environment
//! variables.

use crate::analysis::AnalysisConfig;
use crate::error::IngestError;
use crate::logging::LoggingConfig;
use crate::parser::{default_timestamp_formats, ParserConfig, DEFAULT_TIMESTAMP_COLUMN};
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodycompConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where source exports live and how to read them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,

    #[serde(default = "default_timestamp_formats")]
    pub timestamp_formats: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_timestamp_column() -> String {
    DEFAULT_TIMESTAMP_COLUMN.to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            extension: default_extension(),
            delimiter: default_delimiter(),
            timestamp_column: default_timestamp_column(),
            timestamp_formats: default_timestamp_formats(),
        }
    }
}

impl DataConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.dir.as_os_str().is_empty() {
            return Err("Data directory cannot be empty".to_string());
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err("File extension cannot be empty".to_string());
        }
        if !self.delimiter.is_ascii() {
            return Err(format!("Delimiter {:?} must be a single ASCII character", self.delimiter));
        }
        if self.timestamp_column.trim().is_empty() {
            return Err("Timestamp column cannot be empty".to_string());
        }
        if self.timestamp_formats.is_empty() {
            return Err("At least one timestamp format is required".to_string());
        }
        Ok(())
    }
}

/// Persistence paths. Relative paths resolve against the workspace root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("processed_files.json")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(".bodycomp/snapshot.bin")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.ledger_path.as_os_str().is_empty() {
            return Err("Ledger path cannot be empty".to_string());
        }
        if self.snapshot_path.as_os_str().is_empty() {
            return Err("Snapshot path cannot be empty".to_string());
        }
        if self.ledger_path == self.snapshot_path {
            return Err("Ledger and snapshot must be different files".to_string());
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Data(String),
    Storage(String),
    Analysis(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Data(msg) => write!(f, "data: {}", msg),
            ValidationError::Storage(msg) => write!(f, "storage: {}", msg),
            ValidationError::Analysis(msg) => write!(f, "analysis: {}", msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl BodycompConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Err(e) = self.data.validate() {
            errors.push(ValidationError::Data(e));
        }
        if let Err(e) = self.storage.validate() {
            errors.push(ValidationError::Storage(e));
        }
        if let Err(e) = self.analysis.validate() {
            errors.push(ValidationError::Analysis(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and resolve into the explicit paths the pipeline runs with.
    pub fn pipeline_config(&self, workspace_root: &Path) -> Result<PipelineConfig, IngestError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            IngestError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;

        let root = resolve_workspace_root(workspace_root);
        Ok(PipelineConfig {
            data_dir: resolve(&root, &self.data.dir),
            extension: self.data.extension.clone(),
            ledger_path: resolve(&root, &self.storage.ledger_path),
            snapshot_path: resolve(&root, &self.storage.snapshot_path),
            parser: ParserConfig {
                timestamp_column: self.data.timestamp_column.clone(),
                timestamp_formats: self.data.timestamp_formats.clone(),
                delimiter: self.data.delimiter as u8,
            },
        })
    }
}

/// Canonical workspace root when it exists, the given path otherwise.
pub fn resolve_workspace_root(workspace_root: &Path) -> PathBuf {
    dunce::canonicalize(workspace_root).unwrap_or_else(|_| workspace_root.to_path_buf())
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
