use std::collections::BTreeSet;

use crate::table::ParsedTable;

/// Outcome of checking a parsed table against the required schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// All required columns present and at least one data row.
    Valid(ParsedTable),
    /// Every required column (normalized) absent from the headers.
    Invalid { missing_columns: BTreeSet<String> },
    /// Headers are fine but no data rows remain.
    Empty,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn table(&self) -> Option<&ParsedTable> {
        match self {
            Self::Valid(table) => Some(table),
            _ => None,
        }
    }

    /// Missing columns, empty unless `Invalid`.
    pub fn missing_columns(&self) -> BTreeSet<String> {
        match self {
            Self::Invalid { missing_columns } => missing_columns.clone(),
            _ => BTreeSet::new(),
        }
    }

    /// Message shown to the person who uploaded the file.
    pub fn user_message(&self) -> String {
        match self {
            Self::Valid(table) => format!(
                "File looks good: {} rows ready for training.",
                table.height()
            ),
            Self::Invalid { missing_columns } => format!(
                "Missing required columns: {}. Please fix your file.",
                missing_columns.iter().cloned().collect::<Vec<_>>().join(", ")
            ),
            Self::Empty => {
                "The file appears to be empty. Please check the content and try again.".to_string()
            }
        }
    }
}
