//! Decoded tabular data.

use serde::Serialize;

/// Headers plus rows decoded from an upload.
///
/// Rows are stored positionally: cell `i` of every row belongs to
/// `headers[i]`, and every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParsedTable {
    /// Builds a table, padding short rows with empty cells and dropping
    /// cells beyond the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let idx = self.column_index(header)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Header/value pairs for one row, in header order.
    pub fn record(&self, row: usize) -> Option<impl Iterator<Item = (&str, &str)>> {
        let cells = self.rows.get(row)?;
        Some(
            self.headers
                .iter()
                .map(String::as_str)
                .zip(cells.iter().map(String::as_str)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_rows_are_aligned_to_headers() {
        let table = ParsedTable::new(
            strings(&["a", "b", "c"]),
            vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
        );
        assert_eq!(table.rows()[0], strings(&["1", "", ""]));
        assert_eq!(table.rows()[1], strings(&["1", "2", "3"]));
        assert!(table.rows().iter().all(|r| r.len() == table.width()));
    }

    #[test]
    fn test_cell_lookup() {
        let table =
            ParsedTable::new(strings(&["gender", "race"]), vec![strings(&["F", "Chinese"])]);
        assert_eq!(table.cell(0, "race"), Some("Chinese"));
        assert_eq!(table.cell(0, "missing"), None);
        assert_eq!(table.cell(3, "race"), None);
    }

    #[test]
    fn test_record_pairs() {
        let table = ParsedTable::new(strings(&["gender", "race"]), vec![strings(&["M", ""])]);
        let pairs: Vec<_> = table.record(0).unwrap().collect();
        assert_eq!(pairs, vec![("gender", "M"), ("race", "")]);
        assert!(table.record(1).is_none());
    }
}
