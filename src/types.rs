//! Core data types shared by the ingestion engine and its consumers.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source file identifier: the file name, NFC-normalized.
pub type SourceId = String;

/// Filesystem modification time in seconds since the Unix epoch.
///
/// Stored as a float so ledgers written by earlier versions of the tool
/// (which recorded fractional seconds) compare equal after a reload.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mtime(pub f64);

impl Mtime {
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(d) => Mtime(d.as_secs_f64()),
            Err(e) => Mtime(-e.duration().as_secs_f64()),
        }
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Mtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cell of a source row other than the timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Classify a raw field: empty is missing, finite floats are numbers.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Missing => Ok(()),
        }
    }
}

/// A single measurement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub values: BTreeMap<String, Cell>,
}

impl Record {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, column: impl Into<String>, cell: Cell) -> Self {
        self.values.insert(column.into(), cell);
        self
    }

    /// Calendar day of the measurement (naive, no timezone conversion).
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.values.get(column)
    }

    pub fn metric(&self, column: &str) -> Option<f64> {
        self.values.get(column).and_then(Cell::as_f64)
    }
}

/// Records parsed from one source file, with its header order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedSource {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

/// Canonical merged time series: ascending by timestamp, one record per day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Metric columns in first-seen order (timestamp column excluded).
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn latest(&self) -> Option<&Record> {
        self.records.last()
    }
}

/// Processing state of a discovered source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Unchanged,
    Pending,
    Processed,
    Failed,
}

impl SourceStatus {
    pub fn needs_processing(&self) -> bool {
        matches!(self, SourceStatus::Pending)
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceStatus::Unchanged => "unchanged",
            SourceStatus::Pending => "pending",
            SourceStatus::Processed => "processed",
            SourceStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A candidate input file discovered by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub id: SourceId,
    pub path: std::path::PathBuf,
    pub mtime: Mtime,
    pub status: SourceStatus,
}
