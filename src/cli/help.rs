//! CLI help and command-name contract for logging.

use crate::cli::parse::Commands;

/// Stable command name used in log events (e.g. "ingest", "report").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Ingest => "ingest",
        Commands::Status { .. } => "status",
        Commands::Report { .. } => "report",
        Commands::Export { .. } => "export",
        Commands::Reset => "reset",
        Commands::Config => "config",
    }
}
