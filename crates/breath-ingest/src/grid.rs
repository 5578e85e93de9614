//! Turns a raw cell grid into a [`ParsedTable`].

use breath_model::ParsedTable;

/// Normalizes a header cell: trimmed and lower-cased.
pub fn normalize_cell_header(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Builds a table from the header row and the data rows that follow it.
///
/// Data rows are mapped positionally onto the header list. Fully blank rows
/// are skipped, and a first data row that repeats the header row is dropped.
pub fn table_from_grid<I>(header_row: &[String], data_rows: I) -> ParsedTable
where
    I: IntoIterator<Item = Vec<String>>,
{
    let headers: Vec<String> = header_row
        .iter()
        .map(|h| normalize_cell_header(h))
        .collect();

    let mut rows: Vec<Vec<String>> = data_rows
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    if rows
        .first()
        .is_some_and(|first| repeats_header(first, &headers))
    {
        tracing::debug!("dropping repeated header row");
        rows.remove(0);
    }

    ParsedTable::new(headers, rows)
}

fn repeats_header(row: &[String], headers: &[String]) -> bool {
    headers
        .iter()
        .enumerate()
        .all(|(idx, header)| {
            row.get(idx).map_or("", |c| c.as_str()).trim().to_lowercase() == *header
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_headers_are_normalized() {
        let table = table_from_grid(
            &strings(&[" Gender ", "RACE", ""]),
            vec![strings(&["F", "Malay", "x"])],
        );
        assert_eq!(table.headers(), strings(&["gender", "race", ""]).as_slice());
        assert_eq!(table.cell(0, "race"), Some("Malay"));
    }

    #[test]
    fn test_blank_rows_skipped_and_short_rows_padded() {
        let table = table_from_grid(
            &strings(&["a", "b"]),
            vec![strings(&["", " "]), strings(&["1"]), vec![]],
        );
        assert_eq!(table.height(), 1);
        assert_eq!(table.rows()[0], strings(&["1", ""]));
    }

    #[test]
    fn test_repeated_header_row_dropped() {
        let table = table_from_grid(
            &strings(&["Gender", "Race"]),
            vec![strings(&["gender", " RACE"]), strings(&["M", "Indian"])],
        );
        assert_eq!(table.height(), 1);
        assert_eq!(table.cell(0, "gender"), Some("M"));
    }

    #[test]
    fn test_only_first_row_checked_for_header_repeat() {
        let table = table_from_grid(
            &strings(&["a"]),
            vec![strings(&["1"]), strings(&["a"])],
        );
        assert_eq!(table.height(), 2);
    }
}
