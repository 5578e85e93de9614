//! Display model for validated uploads.

use breath_model::{ParsedTable, RequiredSchema};
use serde::Serialize;

/// Rows shown per page by default.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// A preview column: human-readable title plus the header key it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewColumn {
    pub title: String,
    pub key: String,
}

/// A preview row keyed by its position in the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub index: usize,
    pub cells: Vec<String>,
}

/// Read-only column/row model of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub columns: Vec<PreviewColumn>,
    pub rows: Vec<PreviewRow>,
}

impl Preview {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of pages at `size` rows per page (at least one).
    pub fn page_count(&self, size: usize) -> usize {
        let size = size.max(1);
        self.rows.len().div_ceil(size).max(1)
    }

    /// Rows on zero-based page `n`; empty past the last page.
    pub fn page(&self, n: usize, size: usize) -> &[PreviewRow] {
        let size = size.max(1);
        let start = n.saturating_mul(size).min(self.rows.len());
        let end = start.saturating_add(size).min(self.rows.len());
        &self.rows[start..end]
    }
}

/// Builds the preview for a table.
///
/// Titles come from the schema's display names where the header is a schema
/// key, otherwise the header is title-cased. Cells are copied unchanged.
pub fn materialize(table: &ParsedTable, schema: &RequiredSchema) -> Preview {
    let columns = table
        .headers()
        .iter()
        .map(|key| PreviewColumn {
            title: schema
                .by_key(key)
                .map_or_else(|| humanize(key), |c| c.name().to_string()),
            key: key.clone(),
        })
        .collect();

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, cells)| PreviewRow {
            index,
            cells: cells.clone(),
        })
        .collect();

    Preview { columns, rows }
}

/// `"case type description"` → `"Case Type Description"`.
fn humanize(header: &str) -> String {
    header
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_titles_prefer_schema_names() {
        let table = ParsedTable::new(
            strings(&["patient id", "ward notes"]),
            vec![strings(&["P1", ""])],
        );
        let preview = materialize(&table, &RequiredSchema::training());
        assert_eq!(preview.columns[0].title, "Patient ID");
        assert_eq!(preview.columns[1].title, "Ward Notes");
        assert_eq!(preview.rows[0].cells, strings(&["P1", ""]));
    }

    #[test]
    fn test_paging() {
        let rows = (0..120).map(|i| vec![i.to_string()]).collect();
        let preview = materialize(
            &ParsedTable::new(strings(&["n"]), rows),
            &RequiredSchema::training(),
        );
        assert_eq!(preview.page_count(DEFAULT_PAGE_SIZE), 3);
        assert_eq!(preview.page(0, DEFAULT_PAGE_SIZE).len(), 50);
        assert_eq!(preview.page(2, DEFAULT_PAGE_SIZE).len(), 20);
        assert_eq!(preview.page(2, DEFAULT_PAGE_SIZE)[0].index, 100);
        assert!(preview.page(3, DEFAULT_PAGE_SIZE).is_empty());
        assert!(preview.page(usize::MAX, DEFAULT_PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_empty_preview_has_one_page() {
        assert_eq!(Preview::default().page_count(DEFAULT_PAGE_SIZE), 1);
    }
}
