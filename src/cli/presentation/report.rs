//! Report presentation: comparison against targets, rolling history and change series.

use super::{format_number, format_signed};
use crate::analysis::{self, AnalysisConfig, MetricComparison};
use crate::error::IngestError;
use crate::types::Dataset;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

/// Optional report sections.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportOptions {
    pub history: Option<usize>,
    pub series: bool,
}

pub fn format_comparison_table(rows: &[MetricComparison], config: &AnalysisConfig) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Metric".to_string(),
        format!("Recent {}-avg", config.window),
        format!("{} days earlier", config.lookback_days),
        "Change (%)".to_string(),
        "Target".to_string(),
        "Gap".to_string(),
    ]);
    for row in rows {
        table.add_row(vec![
            row.column.clone(),
            format_number(row.recent_mean, 2),
            format_number(row.past_mean, 2),
            format_signed(row.change_pct, 2),
            format_number(row.target, 1),
            format_signed(row.target_gap, 2),
        ]);
    }
    table.to_string()
}

pub fn format_report_text(
    dataset: &Dataset,
    config: &AnalysisConfig,
    options: ReportOptions,
) -> String {
    let mut sections = Vec::new();

    let rows = analysis::summarize(dataset, config);
    sections.push(format!(
        "Latest {}-record average vs. {} days earlier\n{}",
        config.window,
        config.lookback_days,
        format_comparison_table(&rows, config)
    ));
    if rows.iter().all(|r| r.change_pct.is_none()) {
        sections.push(format!(
            "Not enough history for a comparison: need {} records up to {} days before the latest.",
            config.window, config.lookback_days
        ));
    }

    if let Some(n) = options.history {
        sections.push(format_history(dataset, config, n));
    }

    if options.series {
        for column in &config.metrics {
            let series =
                analysis::change_series(dataset, column, config.window, config.lookback_days);
            if series.is_empty() {
                sections.push(format!(
                    "Not enough data to chart the change rate of {}.",
                    column
                ));
                continue;
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Date".to_string(), format!("{} change (%)", column)]);
            for point in &series {
                table.add_row(vec![
                    point.timestamp.date().to_string(),
                    format!("{:+.2}", point.change_pct),
                ]);
            }
            sections.push(table.to_string());
        }
    }

    sections.join("\n\n")
}

fn format_history(dataset: &Dataset, config: &AnalysisConfig, n: usize) -> String {
    let columns: Vec<Vec<Option<f64>>> = config
        .metrics
        .iter()
        .map(|c| {
            analysis::rolling_mean(dataset, c, config.window)
                .into_iter()
                .map(|p| p.value)
                .collect()
        })
        .collect();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let mut header = vec!["Date".to_string()];
    header.extend(config.metrics.iter().map(|c| format!("{} {}-avg", c, config.window)));
    table.set_header(header);

    let start = dataset.len().saturating_sub(n);
    for (i, record) in dataset.records.iter().enumerate().skip(start) {
        let mut row = vec![record.day().to_string()];
        row.extend(columns.iter().map(|values| format_number(values[i], 2)));
        table.add_row(row);
    }
    table.to_string()
}

pub fn format_report_json(
    dataset: &Dataset,
    config: &AnalysisConfig,
    options: ReportOptions,
    new_data: bool,
) -> Result<String, IngestError> {
    let mut out = serde_json::json!({
        "new_data": new_data,
        "records": dataset.len(),
        "comparison": analysis::summarize(dataset, config),
    });

    if let Some(n) = options.history {
        let history: serde_json::Map<String, serde_json::Value> = config
            .metrics
            .iter()
            .map(|c| {
                let points = analysis::rolling_mean(dataset, c, config.window);
                let start = points.len().saturating_sub(n);
                (c.clone(), serde_json::json!(points[start..]))
            })
            .collect();
        out["history"] = serde_json::Value::Object(history);
    }

    if options.series {
        let series: serde_json::Map<String, serde_json::Value> = config
            .metrics
            .iter()
            .map(|c| {
                let points =
                    analysis::change_series(dataset, c, config.window, config.lookback_days);
                (c.clone(), serde_json::json!(points))
            })
            .collect();
        out["series"] = serde_json::Value::Object(series);
    }

    serde_json::to_string_pretty(&out).map_err(|e| IngestError::OutputError(e.to_string()))
}
