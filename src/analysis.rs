//! Trend analysis over the merged dataset.
//!
//! Rolling averages and "recent vs. a month ago" comparisons of the tracked
//! metrics, plus the distance of the recent average from each fixed target.
//! Windows count records, not days; the dataset already holds at most one
//! record per day.

use crate::types::{Dataset, Record};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const WEIGHT: &str = "体重(kg)";
pub const BODY_FAT: &str = "体脂肪(%)";
pub const SKELETAL_MUSCLE: &str = "骨格筋(%)";

/// Fixed goal for one metric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub column: String,
    pub value: f64,
}

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of records per averaging window
    #[serde(default = "default_window")]
    pub window: usize,

    /// Distance of the comparison window, in days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    /// Columns reported on
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,

    #[serde(default = "default_targets")]
    pub targets: Vec<Target>,
}

fn default_window() -> usize {
    5
}

fn default_lookback_days() -> i64 {
    30
}

fn default_metrics() -> Vec<String> {
    vec![
        WEIGHT.to_string(),
        BODY_FAT.to_string(),
        SKELETAL_MUSCLE.to_string(),
    ]
}

fn default_targets() -> Vec<Target> {
    vec![
        Target {
            column: WEIGHT.to_string(),
            value: 60.0,
        },
        Target {
            column: BODY_FAT.to_string(),
            value: 18.0,
        },
        Target {
            column: SKELETAL_MUSCLE.to_string(),
            value: 37.0,
        },
    ]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            lookback_days: default_lookback_days(),
            metrics: default_metrics(),
            targets: default_targets(),
        }
    }
}

impl AnalysisConfig {
    pub fn target_for(&self, column: &str) -> Option<f64> {
        self.targets
            .iter()
            .find(|t| t.column == column)
            .map(|t| t.value)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.window == 0 {
            return Err("Window must be at least 1".to_string());
        }
        if self.lookback_days <= 0 {
            return Err("Lookback must be a positive number of days".to_string());
        }
        if let Some(t) = self.targets.iter().find(|t| !t.value.is_finite()) {
            return Err(format!("Target for '{}' is not a finite number", t.column));
        }
        Ok(())
    }
}

/// Trailing average at one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

/// Percent change of the trailing average versus the one `lookback_days` earlier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangePoint {
    pub timestamp: NaiveDateTime,
    pub change_pct: f64,
}

/// Latest comparison for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub column: String,
    pub recent_mean: Option<f64>,
    pub past_mean: Option<f64>,
    pub change_pct: Option<f64>,
    pub target: Option<f64>,
    /// `recent_mean - target`
    pub target_gap: Option<f64>,
}

/// Mean over the last `window` records. `None` until the window is full and
/// every value in it is numeric.
pub fn rolling_mean(dataset: &Dataset, column: &str, window: usize) -> Vec<RollingPoint> {
    let records = &dataset.records;
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let value = if window > 0 && i + 1 >= window {
                let slice = &records[i + 1 - window..=i];
                let values: Option<Vec<f64>> = slice.iter().map(|r| r.metric(column)).collect();
                values.map(|v| v.iter().sum::<f64>() / v.len() as f64)
            } else {
                None
            };
            RollingPoint {
                timestamp: record.timestamp,
                value,
            }
        })
        .collect()
}

/// Compare the latest window with the window ending `lookback_days` before it.
pub fn window_comparison(
    dataset: &Dataset,
    column: &str,
    window: usize,
    lookback_days: i64,
    target: Option<f64>,
) -> MetricComparison {
    let (recent_mean, past_mean) = match dataset.latest() {
        Some(latest) => means_at(&dataset.records, column, window, lookback_days, latest.timestamp),
        None => (None, None),
    };
    MetricComparison {
        column: column.to_string(),
        recent_mean,
        past_mean,
        change_pct: percent_change(recent_mean, past_mean),
        target,
        target_gap: recent_mean.zip(target).map(|(r, t)| r - t),
    }
}

/// The comparison of [`window_comparison`] evaluated at every record.
/// Records without two full windows are skipped.
pub fn change_series(
    dataset: &Dataset,
    column: &str,
    window: usize,
    lookback_days: i64,
) -> Vec<ChangePoint> {
    dataset
        .records
        .iter()
        .filter_map(|record| {
            let (recent, past) =
                means_at(&dataset.records, column, window, lookback_days, record.timestamp);
            percent_change(recent, past).map(|change_pct| ChangePoint {
                timestamp: record.timestamp,
                change_pct,
            })
        })
        .collect()
}

/// Comparison rows for every configured metric.
pub fn summarize(dataset: &Dataset, config: &AnalysisConfig) -> Vec<MetricComparison> {
    config
        .metrics
        .iter()
        .map(|column| {
            window_comparison(
                dataset,
                column,
                config.window,
                config.lookback_days,
                config.target_for(column),
            )
        })
        .collect()
}

fn means_at(
    records: &[Record],
    column: &str,
    window: usize,
    lookback_days: i64,
    at: NaiveDateTime,
) -> (Option<f64>, Option<f64>) {
    let recent = tail_mean(records, column, window, at);
    let past = tail_mean(records, column, window, at - Duration::days(lookback_days));
    (recent, past)
}

/// Mean of the last `window` records at or before `cutoff`.
fn tail_mean(records: &[Record], column: &str, window: usize, cutoff: NaiveDateTime) -> Option<f64> {
    let end = records.partition_point(|r| r.timestamp <= cutoff);
    if window == 0 || end < window {
        return None;
    }
    let values: Vec<f64> = records[end - window..end]
        .iter()
        .filter_map(|r| r.metric(column))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn percent_change(recent: Option<f64>, past: Option<f64>) -> Option<f64> {
    match (recent, past) {
        (Some(r), Some(p)) if p != 0.0 => Some((r - p) / p * 100.0),
        _ => None,
    }
}
