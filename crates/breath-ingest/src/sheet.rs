//! Spreadsheet decoding (`.xlsx` and `.xls`) for the first worksheet.

use std::io::Cursor;

use breath_model::ParsedTable;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use chrono::Timelike;

use crate::error::{IngestError, Result};
use crate::grid::table_from_grid;

/// Reads the first worksheet of a workbook into a table.
///
/// The header row is absolute row 0, read across the sheet's used column
/// range; data rows are every following row up to the end of the range.
pub fn read_sheet_bytes(name: &str, bytes: &[u8]) -> Result<ParsedTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| IngestError::decode(name, e))?;

    let sheet_name = workbook.sheet_names().first().cloned();
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| IngestError::decode(name, e))?,
        None => {
            return Err(IngestError::EmptySheet {
                name: name.to_string(),
            });
        }
    };

    let (Some((_, first_col)), Some((last_row, last_col))) = (range.start(), range.end()) else {
        return Err(IngestError::EmptySheet {
            name: name.to_string(),
        });
    };
    tracing::debug!(
        file = %name,
        sheet = sheet_name.as_deref().unwrap_or(""),
        rows = last_row + 1,
        columns = last_col - first_col + 1,
        "reading first worksheet"
    );

    let header_row = read_row(&range, 0, first_col, last_col);
    let data_rows = (1..=last_row).map(|row| read_row(&range, row, first_col, last_col));
    Ok(table_from_grid(&header_row, data_rows))
}

fn read_row(range: &Range<Data>, row: u32, first_col: u32, last_col: u32) -> Vec<String> {
    (first_col..=last_col)
        .map(|col| range.get_value((row, col)).map(cell_text).unwrap_or_default())
        .collect()
}

/// Formatted text of a cell, matching what a spreadsheet displays.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.num_seconds_from_midnight() == 0 => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_float(dt.as_f64()),
        },
        Data::Error(e) => e.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
