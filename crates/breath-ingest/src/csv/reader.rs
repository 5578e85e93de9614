//! Delimited-text decoding.

use breath_model::ParsedTable;

use crate::decode::decode_text;
use crate::error::{IngestError, Result};
use crate::grid::table_from_grid;

/// Reads comma-separated bytes into a table.
///
/// Row 0 is the header row. Records may have differing lengths; short rows
/// are padded and long rows truncated to the header width.
pub fn read_csv_bytes(name: &str, bytes: &[u8]) -> Result<ParsedTable> {
    let decoded = decode_text(bytes)
        .ok_or_else(|| IngestError::decode(name, "not a recognizable text or spreadsheet format"))?;
    tracing::debug!(file = %name, encoding = decoded.encoding.name(), "decoded delimited text");

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::decode(name, e))?;
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if records
        .iter()
        .all(|record| record.iter().all(|cell| cell.trim().is_empty()))
    {
        return Err(IngestError::EmptySheet {
            name: name.to_string(),
        });
    }

    let mut records = records.into_iter();
    let header_row = records.next().unwrap_or_default();

    Ok(table_from_grid(&header_row, records))
}
