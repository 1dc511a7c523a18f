//! Incremental ingestion: idempotence, reprocessing triggers, cross-run merging.

use super::test_utils::{modified, set_mtime, Workspace};
use bodycomp::ledger::LedgerStore;
use bodycomp::types::{Mtime, SourceStatus};
use chrono::NaiveDate;
use std::fs;

#[test]
fn test_second_run_without_changes_is_idempotent() {
    let ws = Workspace::new();
    ws.write_csv("2024-01.csv", &["2024/01/01 08:00,60.0,20.0,35.0", "2024/01/02 08:00,59.8,19.9,35.1"]);

    let pipeline = ws.pipeline();
    let first = pipeline.run().unwrap();
    assert!(first.new_data);

    let ledger_bytes = fs::read(ws.ledger_path()).unwrap();
    let snapshot_bytes = fs::read(ws.snapshot_path()).unwrap();
    let ledger_mtime = modified(&ws.ledger_path());
    let snapshot_mtime = modified(&ws.snapshot_path());

    let second = pipeline.run().unwrap();
    assert!(!second.new_data);
    assert_eq!(second.dataset, first.dataset);
    assert!(second
        .sources
        .iter()
        .all(|s| s.status == SourceStatus::Unchanged));

    assert_eq!(fs::read(ws.ledger_path()).unwrap(), ledger_bytes);
    assert_eq!(fs::read(ws.snapshot_path()).unwrap(), snapshot_bytes);
    assert_eq!(modified(&ws.ledger_path()), ledger_mtime);
    assert_eq!(modified(&ws.snapshot_path()), snapshot_mtime);
}

#[test]
fn test_mtime_change_triggers_reprocessing() {
    let ws = Workspace::new();
    let path = ws.write_csv("a.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    set_mtime(&path, 1_700_000_000);

    let pipeline = ws.pipeline();
    assert!(pipeline.run().unwrap().new_data);
    assert_eq!(
        LedgerStore::new(ws.ledger_path()).load().get("a.csv"),
        Some(Mtime(1_700_000_000.0))
    );

    // Same timestamp: skipped.
    set_mtime(&path, 1_700_000_000);
    let outcome = pipeline.run().unwrap();
    assert!(!outcome.new_data);
    assert_eq!(outcome.sources[0].status, SourceStatus::Unchanged);

    // T+1: reprocessed.
    set_mtime(&path, 1_700_000_001);
    let outcome = pipeline.run().unwrap();
    assert!(outcome.new_data);
    assert_eq!(outcome.sources[0].status, SourceStatus::Processed);
    assert_eq!(
        LedgerStore::new(ws.ledger_path()).load().get("a.csv"),
        Some(Mtime(1_700_000_001.0))
    );

    // Older timestamp (restored backup): reprocessed too.
    set_mtime(&path, 1_600_000_000);
    assert!(pipeline.run().unwrap().new_data);
}

#[test]
fn test_new_file_merges_with_cached_days() {
    let ws = Workspace::new();
    ws.write_csv("2024-01.csv", &["2024/01/01 08:00,60.0,20.0,35.0", "2024/01/02 08:00,59.8,19.9,35.1"]);
    let pipeline = ws.pipeline();
    pipeline.run().unwrap();

    ws.write_csv("2024-02.csv", &["2024/02/01 07:00,59.0,19.0,36.0"]);
    let outcome = pipeline.run().unwrap();

    assert!(outcome.new_data);
    let processed: Vec<&str> = outcome.processed().map(|s| s.id.as_str()).collect();
    assert_eq!(processed, vec!["2024-02.csv"]);
    assert_eq!(outcome.dataset.len(), 3);
    assert_eq!(
        outcome.dataset.first().unwrap().day(),
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
    assert_eq!(
        outcome.dataset.latest().unwrap().day(),
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    );
}

#[test]
fn test_same_day_readings_across_files_keep_latest() {
    let ws = Workspace::new();
    ws.write_csv("a.csv", &["2024/01/01 20:00,59.5,19.0,35.0"]);
    ws.write_csv("b.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);

    let outcome = ws.pipeline().run().unwrap();
    assert_eq!(outcome.dataset.len(), 1);
    assert_eq!(outcome.dataset.records[0].metric("体重(kg)"), Some(59.5));
}

#[test]
fn test_later_export_supersedes_cached_day() {
    let ws = Workspace::new();
    ws.write_csv("a.csv", &["2024/03/01 07:00,61.0,21.0,34.0"]);
    let pipeline = ws.pipeline();
    pipeline.run().unwrap();

    ws.write_csv("b.csv", &["2024/03/01 22:15,60.4,20.6,34.2"]);
    let outcome = pipeline.run().unwrap();
    assert_eq!(outcome.dataset.len(), 1);
    assert_eq!(outcome.dataset.records[0].metric("体重(kg)"), Some(60.4));
}

#[test]
fn test_non_matching_files_are_ignored() {
    let ws = Workspace::new();
    ws.write_csv("a.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    ws.write_raw("notes.txt", "not a csv");
    ws.write_raw("backup.csv.bak", "測定日\ngarbage\n");

    let outcome = ws.pipeline().run().unwrap();
    assert_eq!(outcome.sources.len(), 1);
    assert!(outcome.failures.is_empty());
}

#[test]
fn test_cold_start_is_no_data() {
    let ws = Workspace::new();
    let outcome = ws.pipeline().run().unwrap();
    assert!(outcome.dataset.is_empty());
    assert!(!outcome.new_data);
    assert!(outcome.require_data().is_err());
    assert!(!ws.ledger_path().exists());
    assert!(!ws.snapshot_path().exists());
}
