//! Schema validation for decoded uploads.
//!
//! [`validate`] checks that every required column is present (by normalized
//! name or a known alias, in any order), that data rows remain, and projects
//! the accepted table onto the schema's column keys.

mod columns;

use breath_model::{ParsedTable, RequiredSchema, ValidationResult};

pub use columns::{HeaderMap, missing_columns};

/// Validates a parsed table against the required schema.
///
/// Missing columns are reported in full and take precedence over an empty
/// table. A `Valid` table has exactly the schema keys as headers, in schema
/// order; columns the schema does not name are dropped.
pub fn validate(table: &ParsedTable, schema: &RequiredSchema) -> ValidationResult {
    let map = HeaderMap::build(table.headers(), schema);

    let missing = map.missing(schema);
    if !missing.is_empty() {
        tracing::info!(
            missing = missing.len(),
            columns = ?missing,
            "upload is missing required columns"
        );
        return ValidationResult::Invalid {
            missing_columns: missing,
        };
    }

    if table.is_empty() {
        tracing::info!("upload has no data rows");
        return ValidationResult::Empty;
    }

    if !map.unmatched().is_empty() {
        tracing::debug!(ignored = ?map.unmatched(), "ignoring columns outside the schema");
    }

    ValidationResult::Valid(project(table, schema, &map))
}

fn project(table: &ParsedTable, schema: &RequiredSchema, map: &HeaderMap) -> ParsedTable {
    let positions: Vec<Option<usize>> = schema.keys().map(|key| map.position(key)).collect();
    let headers = schema.keys().map(str::to_string).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            positions
                .iter()
                .map(|pos| pos.and_then(|idx| row.get(idx)).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    ParsedTable::new(headers, rows)
}
