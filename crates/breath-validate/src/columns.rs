//! Header resolution through the schema's canonicalization table.

use std::collections::{BTreeMap, BTreeSet};

use breath_model::RequiredSchema;

/// Maps each required column key to the first parsed column resolving to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    positions: BTreeMap<String, usize>,
    unmatched: Vec<String>,
}

impl HeaderMap {
    /// Resolves every parsed header against `schema`.
    pub fn build(headers: &[String], schema: &RequiredSchema) -> Self {
        let mut positions = BTreeMap::new();
        let mut unmatched = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            match schema.resolve(header) {
                Some(column) => {
                    positions.entry(column.key().to_string()).or_insert(idx);
                }
                None if header.trim().is_empty() => {}
                None => unmatched.push(header.clone()),
            }
        }

        Self {
            positions,
            unmatched,
        }
    }

    /// Parsed column index holding the values for a schema key.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Schema keys with no resolving column, in key order.
    pub fn missing(&self, schema: &RequiredSchema) -> BTreeSet<String> {
        schema
            .keys()
            .filter(|key| !self.contains(key))
            .map(str::to_string)
            .collect()
    }

    /// Non-blank headers that matched no required column.
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }
}

/// Required column keys absent from `headers` (`R \ H` after normalization).
pub fn missing_columns(headers: &[String], schema: &RequiredSchema) -> BTreeSet<String> {
    HeaderMap::build(headers, schema).missing(schema)
}
