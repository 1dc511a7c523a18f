//! Snapshot round-trip through the merge engine.

use bodycomp::merge::{merge, merge_records};
use bodycomp::parser::{ParserConfig, RecordParser};
use bodycomp::snapshot::SnapshotCache;
use bodycomp::types::Dataset;
use tempfile::TempDir;

fn parsed_dataset() -> Dataset {
    let csv = "測定日,体重(kg),体脂肪(%),骨格筋(%),BMI,メモ\n\
               2024/01/03 07:10,60.1,20.0,35.1,22.1,\n\
               2024/01/01 21:00,60.4,20.3,34.9,22.2,夜\n\
               2024/01/01 06:30,60.9,20.5,34.8,22.4,朝\n\
               2024/01/02 07:00,60.2,-,35.0,22.1,\n";
    let parsed = RecordParser::new(ParserConfig::default())
        .parse_reader(csv.as_bytes())
        .unwrap();
    merge(Dataset::new(), vec![parsed])
}

#[test]
fn test_merge_of_loaded_snapshot_is_identity() {
    let temp_dir = TempDir::new().unwrap();
    let cache = SnapshotCache::new(temp_dir.path().join("snapshot.bin"));

    let dataset = parsed_dataset();
    assert_eq!(dataset.len(), 3);
    cache.save(&dataset).unwrap();

    let loaded = cache.load().unwrap().unwrap();
    assert_eq!(merge_records(loaded.clone(), Vec::new()), dataset);
    assert_eq!(merge(loaded, Vec::new()), dataset);
}

#[test]
fn test_snapshot_keeps_extra_and_text_columns() {
    let temp_dir = TempDir::new().unwrap();
    let cache = SnapshotCache::new(temp_dir.path().join("snapshot.bin"));
    cache.save(&parsed_dataset()).unwrap();

    let loaded = cache.load().unwrap().unwrap();
    assert_eq!(
        loaded.columns,
        vec!["体重(kg)", "体脂肪(%)", "骨格筋(%)", "BMI", "メモ"]
    );
    assert_eq!(loaded.records[0].metric("体重(kg)"), Some(60.4));
    assert_eq!(
        loaded.records[1].get("体脂肪(%)").map(|c| c.to_string()),
        Some("-".to_string())
    );
    assert_eq!(loaded.records[0].get("メモ").map(|c| c.to_string()), Some("夜".to_string()));
}
