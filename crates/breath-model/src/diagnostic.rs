//! Diagnostic codes of interest (ICD-10 prefixes).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// An ICD-10 code or code prefix such as `J44`.
///
/// Stored trimmed and upper-cased. Only letters, digits and `.` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiagnosticCode(String);

impl DiagnosticCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DiagnosticCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let well_formed = code.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '.');
        if well_formed {
            Ok(Self(code))
        } else {
            Err(ModelError::InvalidDiagnosticCode(s.to_string()))
        }
    }
}

impl TryFrom<String> for DiagnosticCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiagnosticCode> for String {
    fn from(code: DiagnosticCode) -> Self {
        code.0
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selectable diagnostic code with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: DiagnosticCode,
    pub label: String,
}

/// The known set of diagnostic codes a model can be trained for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticCatalog {
    entries: Vec<CatalogEntry>,
}

impl DiagnosticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn contains(&self, code: &DiagnosticCode) -> bool {
        self.entries.iter().any(|e| &e.code == code)
    }

    pub fn label(&self, code: &DiagnosticCode) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| &e.code == code)
            .map(|e| e.label.as_str())
    }
}

impl Default for DiagnosticCatalog {
    fn default() -> Self {
        Self::new(vec![
            CatalogEntry {
                code: DiagnosticCode("J44".to_string()),
                label: "Chronic obstructive pulmonary disease".to_string(),
            },
            CatalogEntry {
                code: DiagnosticCode("J45".to_string()),
                label: "Asthma".to_string(),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_normalized() {
        let code: DiagnosticCode = " j44 ".parse().unwrap();
        assert_eq!(code.as_str(), "J44");
        let dotted: DiagnosticCode = "J44.1".parse().unwrap();
        assert_eq!(dotted.to_string(), "J44.1");
    }

    #[test]
    fn test_malformed_codes_rejected() {
        assert!("".parse::<DiagnosticCode>().is_err());
        assert!("44J".parse::<DiagnosticCode>().is_err());
        assert!("J 44".parse::<DiagnosticCode>().is_err());
    }

    #[test]
    fn test_default_catalog() {
        let catalog = DiagnosticCatalog::default();
        assert!(catalog.contains(&"J44".parse().unwrap()));
        assert!(catalog.contains(&"j45".parse().unwrap()));
        assert!(!catalog.contains(&"I10".parse().unwrap()));
        assert_eq!(catalog.label(&"J45".parse().unwrap()), Some("Asthma"));
    }
}
