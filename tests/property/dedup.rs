//! Property-based tests for the merge engine's one-record-per-day guarantee

use bodycomp::merge::merge_records;
use bodycomp::types::{Cell, Dataset, Record};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use std::collections::BTreeMap;

const COLUMN: &str = "体重(kg)";

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Records spread over ~10 days with minute resolution so same-day and
/// same-instant collisions are common. The value is the input position.
fn records(offsets: &[u32]) -> Vec<Record> {
    offsets
        .iter()
        .enumerate()
        .map(|(i, &minutes)| {
            Record::new(base() + Duration::minutes(i64::from(minutes)))
                .with_value(COLUMN, Cell::Number(i as f64))
        })
        .collect()
}

/// Expected survivor per day: the latest timestamp, ties going to the later input.
fn expected(offsets: &[u32]) -> BTreeMap<NaiveDate, (NaiveDateTime, f64)> {
    let mut best: BTreeMap<NaiveDate, (NaiveDateTime, f64)> = BTreeMap::new();
    for record in records(offsets) {
        let value = record.metric(COLUMN).unwrap();
        match best.get(&record.day()) {
            Some(&(ts, _)) if ts > record.timestamp => {}
            _ => {
                best.insert(record.day(), (record.timestamp, value));
            }
        }
    }
    best
}

#[test]
fn test_one_record_per_day_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec(0u32..14_400, 0..60),
            |offsets| {
                let dataset = merge_records(Dataset::new(), records(&offsets));

                let days: Vec<NaiveDate> = dataset.records.iter().map(|r| r.day()).collect();
                let mut unique = days.clone();
                unique.dedup();
                prop_assert_eq!(&days, &unique);

                prop_assert!(dataset
                    .records
                    .windows(2)
                    .all(|w| w[0].timestamp < w[1].timestamp));

                let survivors: BTreeMap<NaiveDate, (NaiveDateTime, f64)> = dataset
                    .records
                    .iter()
                    .map(|r| (r.day(), (r.timestamp, r.metric(COLUMN).unwrap())))
                    .collect();
                prop_assert_eq!(survivors, expected(&offsets));

                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_split_merge_matches_single_merge_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(prop::collection::vec(0u32..14_400, 0..40), 0usize..40),
            |(offsets, split)| {
                let all = records(&offsets);
                let split = split.min(all.len());
                let (head, tail) = all.split_at(split);

                let once = merge_records(Dataset::new(), all.clone());
                let staged = merge_records(
                    merge_records(Dataset::new(), head.to_vec()),
                    tail.to_vec(),
                );
                prop_assert_eq!(&staged, &once);

                // Merging nothing into a canonical dataset changes nothing.
                prop_assert_eq!(merge_records(once.clone(), Vec::new()), once);

                Ok(())
            },
        )
        .unwrap();
}
