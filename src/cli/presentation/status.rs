//! Status presentation: ledger, snapshot and per-file scan decisions.

use crate::error::IngestError;
use crate::pipeline::PipelineStatus;
use crate::snapshot::SnapshotInfo;
use crate::types::Mtime;
use chrono::DateTime;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

fn format_mtime(mtime: Mtime) -> String {
    let secs = mtime.as_secs();
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| mtime.to_string())
}

pub fn format_status_text(status: &PipelineStatus, snapshot: Option<&SnapshotInfo>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Ledger: {} ({} entr{})\n",
        status.ledger_shape,
        status.ledger_entries,
        if status.ledger_entries == 1 { "y" } else { "ies" }
    ));
    match snapshot {
        Some(info) if status.snapshot_usable => out.push_str(&format!(
            "Snapshot: {} bytes, blake3 {}\n",
            info.bytes,
            &info.digest[..16]
        )),
        _ if status.snapshot_present => out.push_str("Snapshot: unreadable, will be rebuilt\n"),
        _ => out.push_str("Snapshot: none\n"),
    }

    if status.sources.is_empty() {
        out.push_str("No source files found.");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["File", "Modified", "State"]);
    for source in &status.sources {
        table.add_row(vec![
            source.id.clone(),
            format_mtime(source.mtime),
            source.status.to_string(),
        ]);
    }
    out.push_str(&table.to_string());
    out
}

pub fn format_status_json(
    status: &PipelineStatus,
    snapshot: Option<&SnapshotInfo>,
) -> Result<String, IngestError> {
    let files: Vec<serde_json::Value> = status
        .sources
        .iter()
        .map(|s| {
            serde_json::json!({
                "file": s.id,
                "mtime": s.mtime.as_secs(),
                "status": s.status,
            })
        })
        .collect();
    let out = serde_json::json!({
        "ledger": {
            "shape": status.ledger_shape.to_string(),
            "entries": status.ledger_entries,
        },
        "snapshot": snapshot.map(|info| serde_json::json!({
            "bytes": info.bytes,
            "digest": info.digest,
            "usable": status.snapshot_usable,
        })),
        "files": files,
    });
    serde_json::to_string_pretty(&out).map_err(|e| IngestError::OutputError(e.to_string()))
}
