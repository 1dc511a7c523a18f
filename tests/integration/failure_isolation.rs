//! Per-file failure isolation.

use super::test_utils::Workspace;
use bodycomp::error::ParseError;
use bodycomp::ledger::LedgerStore;
use bodycomp::types::SourceStatus;

#[test]
fn test_bad_file_does_not_block_good_file() {
    let ws = Workspace::new();
    ws.write_csv("good.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    ws.write_raw("bad.csv", "date,体重(kg)\n2024/01/02 08:00,59.0\n");

    let outcome = ws.pipeline().run().unwrap();

    assert!(outcome.new_data);
    assert_eq!(outcome.dataset.len(), 1);
    assert_eq!(outcome.dataset.records[0].metric("体重(kg)"), Some(60.0));

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].id, "bad.csv");
    assert!(matches!(
        outcome.failures[0].error,
        ParseError::MissingTimestampColumn { .. }
    ));
    assert!(outcome.failures[0].to_string().starts_with("bad.csv:"));

    let ledger = LedgerStore::new(ws.ledger_path()).load();
    assert!(ledger.get("good.csv").is_some());
    assert!(ledger.get("bad.csv").is_none());
}

#[test]
fn test_failed_file_is_retried_after_fix() {
    let ws = Workspace::new();
    ws.write_csv("good.csv", &["2024/01/01 08:00,60.0,20.0,35.0"]);
    ws.write_csv("late.csv", &["2024/01/05 08:00,59.0,19.0,36.0", "not a date,1,2,3"]);

    let pipeline = ws.pipeline();
    let first = pipeline.run().unwrap();
    assert_eq!(first.failures.len(), 1);
    assert_eq!(first.dataset.len(), 1, "no rows of a failed file are kept");

    // Still failing: retried, still not recorded, cached data returned.
    let second = pipeline.run().unwrap();
    assert!(!second.new_data);
    assert_eq!(second.failures.len(), 1);
    let late = second.sources.iter().find(|s| s.id == "late.csv").unwrap();
    assert_eq!(late.status, SourceStatus::Failed);
    assert_eq!(second.dataset, first.dataset);

    ws.write_csv("late.csv", &["2024/01/05 08:00,59.0,19.0,36.0"]);
    let third = pipeline.run().unwrap();
    assert!(third.new_data);
    assert!(third.failures.is_empty());
    let processed: Vec<&str> = third.processed().map(|s| s.id.as_str()).collect();
    assert_eq!(processed, vec!["late.csv"]);
    assert_eq!(third.dataset.len(), 2);
}

#[test]
fn test_ragged_rows_fail_the_file() {
    let ws = Workspace::new();
    ws.write_raw("ragged.csv", "測定日,体重(kg)\n2024/01/01 08:00,60.0,1,2\n");
    let outcome = ws.pipeline().run().unwrap();
    assert!(outcome.dataset.is_empty());
    assert!(matches!(
        outcome.failures[0].error,
        ParseError::MalformedRow { .. }
    ));
}
