//! CLI route: single route table and run context. Dispatches to the pipeline and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_ingest_summary, format_report_json, format_report_text, format_status_json,
    format_status_text, write_dataset_csv, ReportOptions,
};
use crate::config::{resolve_workspace_root, BodycompConfig, ConfigLoader};
use crate::error::IngestError;
use crate::pipeline::{IngestOutcome, IngestPipeline};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, warn};

/// Runtime context for CLI execution: workspace, resolved config and the pipeline.
pub struct RunContext {
    workspace_root: PathBuf,
    config: BodycompConfig,
    pipeline: IngestPipeline,
    color: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, IngestError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(workspace_root: PathBuf, config: BodycompConfig) -> Result<Self, IngestError> {
        let workspace_root = resolve_workspace_root(&workspace_root);
        let pipeline = IngestPipeline::new(config.pipeline_config(&workspace_root)?);
        let color = config.logging.color && std::io::stdout().is_terminal();
        Ok(Self {
            workspace_root,
            config,
            pipeline,
            color,
        })
    }

    pub fn workspace_root(&self) -> &PathBuf {
        &self.workspace_root
    }

    pub fn config(&self) -> &BodycompConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &IngestPipeline {
        &self.pipeline
    }

    /// Execute one command and return its stdout text.
    pub fn execute(&self, command: &Commands) -> Result<String, IngestError> {
        match command {
            Commands::Ingest => {
                let outcome = self.pipeline.run()?;
                let summary = format_ingest_summary(&outcome, self.color);
                outcome.require_data()?;
                Ok(summary)
            }
            Commands::Status { format } => {
                let status = self.pipeline.status()?;
                let snapshot = self.pipeline.snapshot_cache().info().unwrap_or_else(|e| {
                    warn!(error = %e, "Snapshot failed verification");
                    None
                });
                if format == "json" {
                    format_status_json(&status, snapshot.as_ref())
                } else {
                    Ok(format_status_text(&status, snapshot.as_ref()))
                }
            }
            Commands::Report {
                history,
                series,
                format,
            } => {
                let outcome = self.ingest_with_data()?;
                let options = ReportOptions {
                    history: *history,
                    series: *series,
                };
                if format == "json" {
                    format_report_json(
                        &outcome.dataset,
                        &self.config.analysis,
                        options,
                        outcome.new_data,
                    )
                } else {
                    Ok(format!(
                        "{}\n\n{}",
                        format_ingest_summary(&outcome, self.color),
                        format_report_text(&outcome.dataset, &self.config.analysis, options)
                    ))
                }
            }
            Commands::Export { output } => {
                let outcome = self.ingest_with_data()?;
                let timestamp_column = &self.config.data.timestamp_column;
                match output {
                    Some(path) => {
                        let file = std::fs::File::create(path).map_err(|e| {
                            IngestError::OutputError(format!("Cannot create {:?}: {}", path, e))
                        })?;
                        write_dataset_csv(&outcome.dataset, timestamp_column, file)?;
                        info!(path = %path.display(), records = outcome.dataset.len(), "Dataset exported");
                        Ok(format!(
                            "Exported {} records to {}",
                            outcome.dataset.len(),
                            path.display()
                        ))
                    }
                    None => {
                        let mut buf = Vec::new();
                        write_dataset_csv(&outcome.dataset, timestamp_column, &mut buf)?;
                        let text = String::from_utf8(buf)
                            .map_err(|e| IngestError::OutputError(e.to_string()))?;
                        Ok(text.trim_end().to_string())
                    }
                }
            }
            Commands::Reset => {
                let (ledger, snapshot) = self.pipeline.reset()?;
                Ok(match (ledger, snapshot) {
                    (false, false) => "Nothing to reset.".to_string(),
                    _ => "Ledger and snapshot removed; the next run re-reads every export."
                        .to_string(),
                })
            }
            Commands::Config => ConfigLoader::to_toml(&self.config)
                .map_err(|e| IngestError::OutputError(e.to_string())),
        }
    }

    fn ingest_with_data(&self) -> Result<IngestOutcome, IngestError> {
        self.pipeline.run()?.require_data()
    }
}
