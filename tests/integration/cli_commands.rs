//! CLI route table against a real workspace.

use super::test_utils::Workspace;
use bodycomp::cli::{Commands, RunContext};
use bodycomp::config::BodycompConfig;
use bodycomp::error::IngestError;
use std::fs;

fn context(ws: &Workspace) -> RunContext {
    RunContext::with_config(ws.root().to_path_buf(), BodycompConfig::default()).unwrap()
}

fn month_of_readings(ws: &Workspace) {
    let jan: Vec<String> = (1..=5)
        .map(|d| format!("2024/01/{:02} 07:00,62.0,21.0,34.0", d))
        .collect();
    let feb: Vec<String> = (10..=14)
        .map(|d| format!("2024/02/{:02} 07:00,60.0,20.0,35.0", d))
        .collect();
    let jan: Vec<&str> = jan.iter().map(String::as_str).collect();
    let feb: Vec<&str> = feb.iter().map(String::as_str).collect();
    ws.write_csv("2024-01.csv", &jan);
    ws.write_csv("2024-02.csv", &feb);
}

#[test]
fn test_ingest_reports_new_then_cached() {
    let ws = Workspace::new();
    month_of_readings(&ws);
    let ctx = context(&ws);

    let first = ctx.execute(&Commands::Ingest).unwrap();
    assert!(first.contains("New CSV data loaded (2 files)"));
    assert!(first.contains("10 days from 2024-01-01 to 2024-02-14"));

    let second = ctx.execute(&Commands::Ingest).unwrap();
    assert!(second.contains("No CSV changes"));
}

#[test]
fn test_report_compares_against_month_ago() {
    let ws = Workspace::new();
    month_of_readings(&ws);

    let out = context(&ws)
        .execute(&Commands::Report {
            history: Some(2),
            series: true,
            format: "text".to_string(),
        })
        .unwrap();
    assert!(out.contains("-3.23"), "weight change missing:\n{}", out);
    assert!(out.contains("+2.94"), "muscle change missing:\n{}", out);
    assert!(out.contains("2024-02-14"));
}

#[test]
fn test_report_without_data_fails_cleanly() {
    let ws = Workspace::new();
    let err = context(&ws)
        .execute(&Commands::Report {
            history: None,
            series: false,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, IngestError::NoDataAvailable { .. }));
}

#[test]
fn test_status_json_lists_files() {
    let ws = Workspace::new();
    month_of_readings(&ws);
    let ctx = context(&ws);
    ctx.execute(&Commands::Ingest).unwrap();

    let out = ctx
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["ledger"]["entries"], 2);
    assert_eq!(value["files"][0]["file"], "2024-01.csv");
    assert_eq!(value["files"][0]["status"], "unchanged");
    assert_eq!(value["snapshot"]["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn test_export_to_file_and_reset() {
    let ws = Workspace::new();
    month_of_readings(&ws);
    let ctx = context(&ws);

    let target = ws.root().join("merged.csv");
    let out = ctx
        .execute(&Commands::Export {
            output: Some(target.clone()),
        })
        .unwrap();
    assert!(out.starts_with("Exported 10 records"));
    let text = fs::read_to_string(&target).unwrap();
    assert_eq!(text.lines().count(), 11);
    assert!(text.starts_with("測定日,体重(kg),体脂肪(%),骨格筋(%)"));

    let out = ctx.execute(&Commands::Reset).unwrap();
    assert!(out.contains("removed"));
    assert!(!ws.ledger_path().exists());
    assert!(!ws.snapshot_path().exists());
    assert_eq!(ctx.execute(&Commands::Reset).unwrap(), "Nothing to reset.");
}
