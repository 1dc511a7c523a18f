//! Record Parser
//!
//! Reads one delimited source file into dated records. Every non-timestamp
//! column is kept as a [`Cell`] so nothing in the export is lost.

use crate::error::ParseError;
use crate::types::{Cell, ParsedSource, Record};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Column holding the measurement time in the scale's CSV export.
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "測定日";

/// Formats tried in order. Date-only forms are read as midnight.
pub fn default_timestamp_formats() -> Vec<String> {
    [
        "%Y/%m/%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y/%m/%d",
        "%Y-%m-%d",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub timestamp_column: String,
    pub timestamp_formats: Vec<String>,
    pub delimiter: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            timestamp_formats: default_timestamp_formats(),
            delimiter: b',',
        }
    }
}

pub struct RecordParser {
    config: ParserConfig,
}

impl RecordParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the file at `path`. The file is closed before this returns.
    pub fn parse(&self, path: &Path) -> Result<ParsedSource, ParseError> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<ParsedSource, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ParseError::MalformedHeader(e.to_string()))?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        let ts_index = headers
            .iter()
            .position(|h| *h == self.config.timestamp_column)
            .ok_or_else(|| ParseError::MissingTimestampColumn {
                column: self.config.timestamp_column.clone(),
            })?;

        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != ts_index)
            .map(|(_, h)| h.clone())
            .collect();

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            // Row numbers are 1-based and count the header line.
            let row_number = i + 2;
            let row = row.map_err(|e| ParseError::MalformedRow {
                row: row_number,
                reason: e.to_string(),
            })?;

            let raw_ts = row.get(ts_index).unwrap_or("");
            let timestamp =
                self.parse_timestamp(raw_ts)
                    .ok_or_else(|| ParseError::InvalidTimestamp {
                        row: row_number,
                        value: raw_ts.to_string(),
                    })?;

            let mut values = BTreeMap::new();
            for (col, (name, raw)) in headers.iter().zip(row.iter()).enumerate() {
                if col != ts_index {
                    values.insert(name.clone(), Cell::parse(raw));
                }
            }
            records.push(Record { timestamp, values });
        }

        Ok(ParsedSource { columns, records })
    }

    fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        for format in &self.config.timestamp_formats {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(ts);
            }
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                if let Some(ts) = date.and_hms_opt(0, 0, 0) {
                    return Some(ts);
                }
            }
        }
        None
    }
}
