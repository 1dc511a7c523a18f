//! Ingestion pipeline
//!
//! Scan → parse changed files → merge with the cached dataset → persist.
//! Assumes a single writer: concurrent runs against the same ledger and
//! snapshot files may race.

use crate::error::{IngestError, ParseError};
use crate::ledger::{LedgerShape, LedgerStore};
use crate::merge;
use crate::parser::{ParserConfig, RecordParser};
use crate::scanner::SourceScanner;
use crate::snapshot::SnapshotCache;
use crate::types::{Dataset, SourceFile, SourceId, SourceStatus};
use std::path::PathBuf;
use tracing::{info, warn};

/// Resolved paths and parser settings for one pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub extension: String,
    pub ledger_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub parser: ParserConfig,
}

/// A source file that could not be ingested this run.
#[derive(Debug)]
pub struct SourceFailure {
    pub id: SourceId,
    pub error: ParseError,
}

impl std::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.error)
    }
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct IngestOutcome {
    pub dataset: Dataset,
    /// True when at least one source was parsed and merged this run.
    pub new_data: bool,
    pub sources: Vec<SourceFile>,
    pub failures: Vec<SourceFailure>,
    data_dir: PathBuf,
}

impl IngestOutcome {
    pub fn processed(&self) -> impl Iterator<Item = &SourceFile> {
        self.sources
            .iter()
            .filter(|s| s.status == SourceStatus::Processed)
    }

    /// Fail with `NoDataAvailable` when the run produced an empty dataset.
    pub fn require_data(self) -> Result<Self, IngestError> {
        if self.dataset.is_empty() {
            return Err(IngestError::NoDataAvailable {
                data_dir: self.data_dir,
                failures: self.failures.iter().map(|f| f.to_string()).collect(),
            });
        }
        Ok(self)
    }
}

/// Read-only view of what the next run would do.
#[derive(Debug)]
pub struct PipelineStatus {
    pub ledger_shape: LedgerShape,
    pub ledger_entries: usize,
    /// A snapshot file exists, readable or not.
    pub snapshot_present: bool,
    /// The snapshot loads and verifies; otherwise the ledger is ignored.
    pub snapshot_usable: bool,
    pub sources: Vec<SourceFile>,
}

pub struct IngestPipeline {
    ledger: LedgerStore,
    scanner: SourceScanner,
    parser: RecordParser,
    snapshot: SnapshotCache,
}

impl IngestPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            ledger: LedgerStore::new(config.ledger_path),
            scanner: SourceScanner::new(config.data_dir, &config.extension),
            parser: RecordParser::new(config.parser),
            snapshot: SnapshotCache::new(config.snapshot_path),
        }
    }

    pub fn ledger_store(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn snapshot_cache(&self) -> &SnapshotCache {
        &self.snapshot
    }

    /// Run one ingestion pass.
    pub fn run(&self) -> Result<IngestOutcome, IngestError> {
        let mut ledger = self.ledger.load();
        let cached = match self.snapshot.load() {
            Ok(cached) => cached,
            Err(e) => {
                warn!(error = %e, "Snapshot unreadable, rebuilding from all sources");
                None
            }
        };

        // The ledger only describes what the snapshot contains; without a
        // snapshot every source has to be read again.
        if cached.is_none() && !ledger.is_empty() {
            info!(
                entries = ledger.len(),
                "No usable snapshot, ignoring ledger for this run"
            );
            ledger = Default::default();
        }

        let mut sources = self.scanner.scan(&ledger)?;
        let pending = sources.iter().filter(|s| s.status.needs_processing()).count();
        info!(
            total = sources.len(),
            pending, "Scanned data directory"
        );

        let mut parsed = Vec::new();
        let mut failures = Vec::new();
        for source in sources.iter_mut().filter(|s| s.status.needs_processing()) {
            match self.parser.parse(&source.path) {
                Ok(records) => {
                    info!(file = %source.id, records = records.records.len(), "Parsed source");
                    source.status = SourceStatus::Processed;
                    ledger.record(source.id.clone(), source.mtime);
                    parsed.push(records);
                }
                Err(error) => {
                    warn!(file = %source.id, error = %error, "Failed to parse source, will retry next run");
                    source.status = SourceStatus::Failed;
                    failures.push(SourceFailure {
                        id: source.id.clone(),
                        error,
                    });
                }
            }
        }

        let data_dir = self.scanner.root().to_path_buf();
        if !parsed.is_empty() {
            let dataset = merge::merge(cached.unwrap_or_default(), parsed);
            self.snapshot.save(&dataset)?;
            self.ledger.save(&ledger)?;
            info!(records = dataset.len(), "Merged new data into snapshot");
            return Ok(IngestOutcome {
                dataset,
                new_data: true,
                sources,
                failures,
                data_dir,
            });
        }

        let dataset = match cached {
            Some(dataset) => {
                info!(records = dataset.len(), "No new data, using snapshot");
                dataset
            }
            None => {
                warn!(dir = %data_dir.display(), "No snapshot and no parseable sources");
                Dataset::new()
            }
        };
        Ok(IngestOutcome {
            dataset,
            new_data: false,
            sources,
            failures,
            data_dir,
        })
    }

    /// Report ledger, snapshot and scan state without parsing or writing.
    pub fn status(&self) -> Result<PipelineStatus, IngestError> {
        let (ledger, ledger_shape) = self.ledger.load_with_shape();
        let snapshot_present = self.snapshot.exists();
        let snapshot_usable = match self.snapshot.load() {
            Ok(cached) => cached.is_some(),
            Err(e) => {
                warn!(error = %e, "Snapshot unreadable, next run rebuilds from all sources");
                false
            }
        };
        let effective = if snapshot_usable {
            ledger.clone()
        } else {
            Default::default()
        };
        let sources = self.scanner.scan(&effective)?;
        Ok(PipelineStatus {
            ledger_shape,
            ledger_entries: ledger.len(),
            snapshot_present,
            snapshot_usable,
            sources,
        })
    }

    /// Delete ledger and snapshot so the next run re-ingests everything.
    pub fn reset(&self) -> Result<(bool, bool), IngestError> {
        let ledger_removed = self.ledger.clear()?;
        let snapshot_removed = self.snapshot.clear()?;
        info!(ledger_removed, snapshot_removed, "Pipeline state reset");
        Ok((ledger_removed, snapshot_removed))
    }
}
