//! CLI parse: clap types for bodycomp. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bodycomp - body-composition CSV ingestion and trend reports
#[derive(Parser, Debug)]
#[command(name = "bodycomp")]
#[command(about = "Merge body-composition scale exports and report trends against targets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (relative config paths resolve against it)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Ingest new or changed exports and update the cache
    Ingest,
    /// Show ledger, snapshot and per-file state without ingesting
    Status {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Ingest, then report averages and change against targets
    Report {
        /// Also show the last N rolling averages
        #[arg(long)]
        history: Option<usize>,
        /// Also show the month-over-month change series per metric
        #[arg(long)]
        series: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Ingest, then write the merged dataset as CSV
    Export {
        /// Destination file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Forget ingested files and cached data; the next run re-reads everything
    Reset,
    /// Print the effective configuration as TOML
    Config,
}
