//! Ledger compatibility and cache invalidation.

use super::test_utils::{set_mtime, Workspace};
use bodycomp::ledger::{LedgerShape, LedgerStore};
use bodycomp::types::{Mtime, SourceStatus};
use std::fs;

#[test]
fn test_legacy_list_ledger_reprocesses_everything() {
    let ws = Workspace::new();
    ws.write_csv("a.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    let pipeline = ws.pipeline();
    pipeline.run().unwrap();

    fs::write(ws.ledger_path(), r#"["a.csv"]"#).unwrap();
    let outcome = pipeline.run().unwrap();

    assert!(outcome.new_data);
    assert_eq!(outcome.sources[0].status, SourceStatus::Processed);
    let (ledger, shape) = LedgerStore::new(ws.ledger_path()).load_with_shape();
    assert_eq!(shape, LedgerShape::Mapping);
    assert!(ledger.get("a.csv").is_some());
}

#[test]
fn test_ledger_written_by_earlier_versions_is_honoured() {
    let ws = Workspace::new();
    let path = ws.write_csv("a.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    set_mtime(&path, 1_712_345_678);
    let pipeline = ws.pipeline();
    pipeline.run().unwrap();

    // Indent-2 mapping as written by earlier releases.
    fs::write(ws.ledger_path(), "{\n  \"a.csv\": 1712345678.0\n}").unwrap();
    let outcome = pipeline.run().unwrap();
    assert!(!outcome.new_data);
    assert_eq!(outcome.sources[0].status, SourceStatus::Unchanged);
}

#[test]
fn test_missing_snapshot_forces_rebuild() {
    let ws = Workspace::new();
    ws.write_csv("a.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    ws.write_csv("b.csv", &["2024/01/02 08:00,59.0,20.0,35.0"]);
    let pipeline = ws.pipeline();
    let first = pipeline.run().unwrap();

    fs::remove_file(ws.snapshot_path()).unwrap();
    let outcome = pipeline.run().unwrap();
    assert!(outcome.new_data);
    assert_eq!(outcome.dataset, first.dataset);
}

#[test]
fn test_corrupt_snapshot_forces_rebuild() {
    let ws = Workspace::new();
    ws.write_csv("a.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    let pipeline = ws.pipeline();
    let first = pipeline.run().unwrap();

    fs::write(ws.snapshot_path(), b"not a snapshot").unwrap();
    let status = pipeline.status().unwrap();
    assert!(status.snapshot_present);
    assert!(!status.snapshot_usable);
    assert_eq!(status.ledger_entries, 1);
    assert_eq!(status.sources[0].status, SourceStatus::Pending);

    let outcome = pipeline.run().unwrap();
    assert_eq!(outcome.sources[0].status, SourceStatus::Processed);
    assert!(outcome.new_data);
    assert_eq!(outcome.dataset, first.dataset);
    assert!(pipeline.snapshot_cache().load().unwrap().is_some());
}

#[test]
fn test_status_does_not_write() {
    let ws = Workspace::new();
    let path = ws.write_csv("a.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    set_mtime(&path, 1_700_000_000);

    let pipeline = ws.pipeline();
    let status = pipeline.status().unwrap();
    assert_eq!(status.ledger_shape, LedgerShape::Absent);
    assert!(!status.snapshot_present);
    assert!(!status.snapshot_usable);
    assert_eq!(status.sources[0].status, SourceStatus::Pending);
    assert!(!ws.ledger_path().exists());

    pipeline.run().unwrap();
    let status = pipeline.status().unwrap();
    assert!(status.snapshot_usable);
    assert_eq!(status.ledger_entries, 1);
    assert_eq!(status.sources[0].mtime, Mtime(1_700_000_000.0));
    assert_eq!(status.sources[0].status, SourceStatus::Unchanged);
}
