//! User-supplied training metadata.

use breath_model::{DiagnosticCatalog, DiagnosticCode};
use thiserror::Error;

/// Longest accepted model name, in characters.
pub const MAX_MODEL_NAME_LEN: usize = 10;

/// Problems with the model name or diagnostic interest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("model name is required")]
    ModelNameMissing,

    #[error("model name has {len} characters (maximum {max})")]
    ModelNameTooLong { len: usize, max: usize },

    #[error("diagnostic interest is required")]
    DiagnosticInterestMissing,

    #[error("diagnostic interest '{0}' is not one of the known codes")]
    UnknownDiagnosticInterest(String),
}

impl MetadataError {
    pub fn user_message(&self) -> String {
        match self {
            Self::ModelNameMissing => "Please enter a model name.".to_string(),
            Self::ModelNameTooLong { max, .. } => {
                format!("Model name must be at most {max} characters.")
            }
            Self::DiagnosticInterestMissing => {
                "Please select a diagnostic code of interest.".to_string()
            }
            Self::UnknownDiagnosticInterest(code) => {
                format!("{code} is not a diagnostic code a model can be trained for.")
            }
        }
    }
}

/// Model name and diagnostic interest that passed the form rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingMetadata {
    model_name: String,
    diagnostic_interest: DiagnosticCode,
}

impl TrainingMetadata {
    pub fn new(
        model_name: &str,
        diagnostic_interest: &str,
        catalog: &DiagnosticCatalog,
    ) -> Result<Self, MetadataError> {
        let model_name = model_name.trim();
        if model_name.is_empty() {
            return Err(MetadataError::ModelNameMissing);
        }
        let len = model_name.chars().count();
        if len > MAX_MODEL_NAME_LEN {
            return Err(MetadataError::ModelNameTooLong {
                len,
                max: MAX_MODEL_NAME_LEN,
            });
        }

        if diagnostic_interest.trim().is_empty() {
            return Err(MetadataError::DiagnosticInterestMissing);
        }
        let code: DiagnosticCode = diagnostic_interest
            .parse()
            .map_err(|_| {
                MetadataError::UnknownDiagnosticInterest(diagnostic_interest.to_string())
            })?;
        if !catalog.contains(&code) {
            return Err(MetadataError::UnknownDiagnosticInterest(code.to_string()));
        }

        Ok(Self {
            model_name: model_name.to_string(),
            diagnostic_interest: code,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn diagnostic_interest(&self) -> &DiagnosticCode {
        &self.diagnostic_interest
    }
}
