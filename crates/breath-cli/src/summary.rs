use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use breath_core::{Preview, Step};
use breath_model::{
    CatalogEntry, ModelHistory, ModelStatus, ParsedTable, PredictionResponse, RequiredSchema,
    ValidationResult, normalize_header,
};

/// Days at which the prediction curves are tabulated.
const CURVE_DAYS: [u32; 6] = [30, 60, 90, 180, 365, 730];

pub fn print_step(step: Step, message: &str) {
    println!("[{}/3] {}: {}", step.number(), step.name(), message);
}

/// Required columns and whether the upload provides them.
pub fn check_table(
    schema: &RequiredSchema,
    parsed: &ParsedTable,
    result: &ValidationResult,
) -> Table {
    let missing: BTreeSet<String> = result.missing_columns();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Required column"),
        header_cell("Found as"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);

    for column in schema.columns() {
        let found = parsed
            .headers()
            .iter()
            .find(|h| column.matches(&normalize_header(h)));
        let status = if missing.contains(column.key()) {
            Cell::new("missing")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(column.name()),
            found.map_or_else(|| dim_cell("-"), Cell::new),
            status,
        ]);
    }
    table
}

/// One page of a preview, with a leading row-number column.
pub fn preview_table(preview: &Preview, page: usize, page_size: usize) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(preview.columns.iter().map(|c| header_cell(&c.title)));
    table.set_header(header);
    apply_wide_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for row in preview.page(page, page_size) {
        let mut cells = vec![dim_cell(row.index + 1)];
        cells.extend(row.cells.iter().map(|value| {
            if value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(value)
            }
        }));
        table.add_row(cells);
    }
    table
}

pub fn models_table(history: &ModelHistory, now: DateTime<Utc>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Model ID"),
        header_cell("Name"),
        header_cell("C-index"),
        header_cell("Trained"),
        header_cell("Expires"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    for model in history.models() {
        table.add_row(vec![
            Cell::new(model.model_id),
            model
                .model_name
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            model
                .c_index
                .map_or_else(|| dim_cell("-"), |c| Cell::new(format!("{c:.3}"))),
            Cell::new(model.trained_at.format("%Y-%m-%d %H:%M")),
            model
                .expires_at
                .map_or_else(|| dim_cell("-"), |e| Cell::new(e.format("%Y-%m-%d"))),
            status_cell(history.status(model, now)),
        ]);
    }
    table
}

pub fn codes_table(entries: &[CatalogEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("Description")]);
    apply_table_style(&mut table);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.code.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            if entry.label.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(&entry.label)
            },
        ]);
    }
    table
}

pub fn prediction_table(response: &PredictionResponse) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Outcome"), header_cell("Probability")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, value) in response.headline() {
        table.add_row(vec![Cell::new(label), percent_cell(value)]);
    }
    table
}

/// Returned curves sampled at fixed days.
pub fn curve_table(response: &PredictionResponse) -> Table {
    let curves = response.curves();
    let mut table = Table::new();
    let mut header = vec![header_cell("Day")];
    header.extend(curves.iter().map(|(label, _)| header_cell(label)));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 0..=curves.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for day in CURVE_DAYS {
        let mut row = vec![Cell::new(day)];
        row.extend(
            curves
                .iter()
                .map(|(_, curve)| Cell::new(format!("{:.1}%", curve.at(f64::from(day)) * 100.0))),
        );
        table.add_row(row);
    }
    table
}

fn status_cell(status: ModelStatus) -> Cell {
    match status {
        ModelStatus::InUse => Cell::new(status.label())
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        ModelStatus::NotInUse => Cell::new(status.label()),
        ModelStatus::Expired => dim_cell(status.label()),
    }
}

fn percent_cell(value: f64) -> Cell {
    let cell = Cell::new(format!("{:.1}%", value * 100.0));
    if value >= 0.5 {
        cell.fg(Color::Red).add_attribute(Attribute::Bold)
    } else if value >= 0.2 {
        cell.fg(Color::Yellow)
    } else {
        cell
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use breath_core::materialize;
    use breath_model::{DiagnosticCatalog, ModelMetadata};
    use chrono::TimeZone;

    fn plain(mut table: Table) -> String {
        table.force_no_tty();
        table.to_string()
    }

    #[test]
    fn test_check_table_marks_missing() {
        let schema = RequiredSchema::training();
        let parsed = ParsedTable::new(vec!["sex".to_string()], Vec::new());
        let result = ValidationResult::Invalid {
            missing_columns: schema.keys().filter(|k| *k != "gender").map(str::to_string).collect(),
        };
        let text = plain(check_table(&schema, &parsed, &result));
        assert!(text.contains("Gender"));
        assert!(text.contains("sex"));
        assert_eq!(text.matches("missing").count(), 9);
    }

    #[test]
    fn test_preview_table_numbers_rows_from_one() {
        let table = ParsedTable::new(
            vec!["patient id".to_string()],
            vec![vec!["P1".to_string()], vec![String::new()]],
        );
        let preview = materialize(&table, &RequiredSchema::training());
        let text = plain(preview_table(&preview, 0, 50));
        assert!(text.contains("Patient ID"));
        assert!(text.contains("P1"));
        assert!(text.contains(" 2 "));
    }

    #[test]
    fn test_models_table_status() {
        let at = |d| Utc.with_ymd_and_hms(2024, 1, d, 8, 0, 0).unwrap();
        let history = ModelHistory::new(vec![
            ModelMetadata {
                model_id: 1,
                model_name: Some("old".to_string()),
                c_index: Some(0.7),
                trained_at: at(1),
                expires_at: Some(at(2)),
            },
            ModelMetadata {
                model_id: 2,
                model_name: None,
                c_index: None,
                trained_at: at(5),
                expires_at: None,
            },
        ]);
        let text = plain(models_table(&history, at(20)));
        assert!(text.contains("Model In Use"));
        assert!(text.contains("Expired"));
        assert!(text.contains("0.700"));
    }

    #[test]
    fn test_prediction_tables_follow_response_shape() {
        let survival: PredictionResponse = serde_json::from_str(
            r#"{
                "survival_6_month": 0.85, "survival_12_month": 0.75,
                "readmission_1_year": 0.3, "readmission_5_year": 0.6,
                "survival_curve": {"time": [0, 30, 60, 90], "probability": [0, 0.05, 0.1, 0.15]}
            }"#,
        )
        .unwrap();
        let text = plain(prediction_table(&survival));
        assert!(text.contains("Survival at 6 months"));
        assert!(text.contains("85.0%"));
        let curves = plain(curve_table(&survival));
        assert!(curves.contains("Survival"));
        assert!(!curves.contains("Not readmitted"));
    }

    #[test]
    fn test_codes_table_lists_catalog() {
        let text = plain(codes_table(DiagnosticCatalog::default().entries()));
        assert!(text.contains("J44"));
        assert!(text.contains("Asthma"));
    }
}
