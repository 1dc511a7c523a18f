//! CLI presentation: text and json formatters per command family.

mod export;
mod ingest;
mod report;
mod status;

pub use export::write_dataset_csv;
pub use ingest::format_ingest_summary;
pub use report::{format_comparison_table, format_report_json, format_report_text, ReportOptions};
pub use status::{format_status_json, format_status_text};

fn format_number(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn format_signed(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:+.*}", precision, v),
        None => "-".to_string(),
    }
}
