//! Merge & Dedup Engine
//!
//! Pure combination of the cached dataset with freshly parsed records. This
//! is the only place the one-record-per-day policy is decided.

use crate::types::{Dataset, ParsedSource, Record};

/// Merge parsed sources (in scan order) into `existing`.
pub fn merge(existing: Dataset, incoming: Vec<ParsedSource>) -> Dataset {
    let mut columns = existing.columns;
    let mut records = existing.records;
    for source in incoming {
        extend_columns(&mut columns, &source.columns);
        records.extend(source.records);
    }
    Dataset {
        columns,
        records: dedup_by_day(records),
    }
}

/// Merge bare records into `existing`, deriving any new columns from the records.
pub fn merge_records(existing: Dataset, incoming: Vec<Record>) -> Dataset {
    let mut columns = existing.columns;
    for record in &incoming {
        let names: Vec<String> = record.values.keys().cloned().collect();
        extend_columns(&mut columns, &names);
    }
    let mut records = existing.records;
    records.extend(incoming);
    Dataset {
        columns,
        records: dedup_by_day(records),
    }
}

/// Stable-sort by timestamp, then keep the last record of each calendar day.
///
/// Records with identical timestamps keep their input order, so the later
/// input wins the day.
pub fn dedup_by_day(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by_key(|r| r.timestamp);

    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    for record in records {
        match out.last_mut() {
            Some(last) if last.day() == record.day() => *last = record,
            _ => out.push(record),
        }
    }
    out
}

fn extend_columns(columns: &mut Vec<String>, more: &[String]) {
    for name in more {
        if !columns.iter().any(|c| c == name) {
            columns.push(name.clone());
        }
    }
}
