//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::IngestError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &IngestError) -> String {
    match e {
        IngestError::NoDataAvailable { data_dir, failures } => {
            let mut message = format!(
                "No valid data found. Add CSV exports to {} and run again.",
                data_dir.display()
            );
            for failure in failures {
                message.push_str(&format!("\nFailed to read {}", failure));
            }
            message
        }
        other => format!("Error: {}", other),
    }
}

/// Process exit code per error category.
pub fn exit_code(e: &IngestError) -> i32 {
    match e {
        IngestError::NoDataAvailable { .. } => 2,
        IngestError::ConfigError(_) => 3,
        IngestError::StorageError(_) | IngestError::OutputError(_) => 1,
    }
}
