//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the pipeline.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_comparison_table, format_ingest_summary, format_report_json, format_report_text,
    format_status_json, format_status_text, write_dataset_csv, ReportOptions,
};
pub use route::RunContext;
