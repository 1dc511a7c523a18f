//! Export presentation: the merged dataset as CSV.

use crate::error::IngestError;
use crate::types::Dataset;
use std::io::Write;

const EXPORT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Write `dataset` with `timestamp_column` first, then every metric column.
pub fn write_dataset_csv<W: Write>(
    dataset: &Dataset,
    timestamp_column: &str,
    writer: W,
) -> Result<(), IngestError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let to_output = |e: csv::Error| IngestError::OutputError(e.to_string());

    let mut header = vec![timestamp_column.to_string()];
    header.extend(dataset.columns.iter().cloned());
    wtr.write_record(&header).map_err(to_output)?;

    for record in &dataset.records {
        let mut row = vec![record.timestamp.format(EXPORT_TIMESTAMP_FORMAT).to_string()];
        row.extend(dataset.columns.iter().map(|c| {
            record.get(c).map(|cell| cell.to_string()).unwrap_or_default()
        }));
        wtr.write_record(&row).map_err(to_output)?;
    }
    wtr.flush()
        .map_err(|e| IngestError::OutputError(e.to_string()))
}
