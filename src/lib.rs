//! bodycomp: incremental ingestion of body-composition scale exports
//!
//! Tracks which CSV exports have been read, parses only new or modified ones,
//! merges them into a one-record-per-day time series cached on disk, and
//! reports rolling averages and month-over-month change against targets.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod merge;
pub mod parser;
pub mod pipeline;
pub mod scanner;
pub mod snapshot;
pub mod types;

pub use error::{IngestError, ParseError, StorageError};
pub use pipeline::{IngestOutcome, IngestPipeline, PipelineConfig};
pub use types::{Cell, Dataset, Record};
