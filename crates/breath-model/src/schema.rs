//! Required column schema for training uploads.

use std::fmt;

/// Normalizes a header for comparison.
///
/// Lower-cases, trims and collapses internal whitespace runs to a single
/// space, so `"  Patient   ID "` and `"patient id"` compare equal.
pub fn normalize_header(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A required column: its display name plus known header variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    name: String,
    key: String,
    aliases: Vec<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = normalize_header(&name);
        Self {
            name,
            key,
            aliases: Vec::new(),
        }
    }

    /// Adds header variants that resolve to this column.
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|a| normalize_header(a.as_ref())));
        self
    }

    /// Display name, e.g. `"Patient ID"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized name, e.g. `"patient id"`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// True when an already-normalized header names this column.
    pub fn matches(&self, normalized: &str) -> bool {
        self.key == normalized || self.aliases.iter().any(|a| a == normalized)
    }
}

/// Ordered set of columns an upload must contain.
///
/// Only presence is checked; the order is used for previews and templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredSchema {
    columns: Vec<ColumnSpec>,
}

impl RequiredSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The ten columns the training service consumes.
    pub fn training() -> Self {
        Self::new(vec![
            ColumnSpec::new("Admit/Visit Date/Time")
                .with_aliases(["admit date/time", "visit date/time", "admit/visit datetime"]),
            ColumnSpec::new("Date of Birth").with_aliases(["dob", "birth date"]),
            ColumnSpec::new("Gender").with_aliases(["sex"]),
            ColumnSpec::new("Race"),
            ColumnSpec::new("Death Date").with_aliases(["date of death"]),
            ColumnSpec::new("Case Type Description"),
            ColumnSpec::new("Primary Diagnosis Code (Mediclaim)")
                .with_aliases(["primary diagnosis code"]),
            ColumnSpec::new("Secondary Diagnosis Code Concat (Mediclaim)")
                .with_aliases(["secondary diagnosis code concat"]),
            ColumnSpec::new("Discharge Date/Time").with_aliases(["discharge date"]),
            ColumnSpec::new("Patient ID").with_aliases(["patient_id", "patientid"]),
        ])
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Normalized column keys in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnSpec::key)
    }

    /// Display names in schema order.
    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(ColumnSpec::name)
    }

    /// Resolves a raw header through the canonicalization table.
    pub fn resolve(&self, header: &str) -> Option<&ColumnSpec> {
        let normalized = normalize_header(header);
        self.columns.iter().find(|c| c.matches(&normalized))
    }

    /// Looks up a column by its normalized key.
    pub fn by_key(&self, key: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.key == key)
    }
}

impl Default for RequiredSchema {
    fn default() -> Self {
        Self::training()
    }
}

impl fmt::Display for RequiredSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.display_names().collect();
        f.write_str(&names.join(", "))
    }
}
