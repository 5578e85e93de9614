//! Workflow errors.
//!
//! Every variant is recoverable: the workflow stays at its current step and
//! the caller shows [`WorkflowError::user_message`].

use std::collections::BTreeSet;
use std::time::Duration;

use breath_ingest::IngestError;
use thiserror::Error;

use crate::metadata::MetadataError;
use crate::training::TrainingError;
use crate::workflow::Step;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    // === Upload ===
    #[error("{name} is not an xlsx, xls, or csv file")]
    UnsupportedFile { name: String },

    #[error("failed to decode {name}: {message}")]
    Decode { name: String, message: String },

    #[error("{name} has no readable cells in its first sheet")]
    EmptySheet { name: String },

    #[error("parsing {name} did not finish within {}s", .after.as_secs_f32())]
    ParseTimeout { name: String, after: Duration },

    #[error("missing required columns: {}", join(.missing))]
    SchemaMismatch { missing: BTreeSet<String> },

    #[error("file has no data rows")]
    EmptyFile,

    #[error("training metadata: {0}")]
    MetadataMissing(#[from] MetadataError),

    #[error("no file selected")]
    NoFile,

    // === Training ===
    #[error("training service: {0}")]
    TrainingService(#[from] TrainingError),

    // === Navigation ===
    #[error("operation requires the {expected} step, workflow is at {actual}")]
    WrongStep { expected: Step, actual: Step },

    #[error("workflow is finished; start a new one to train another model")]
    Terminal,

    #[error("already at the first step")]
    AtFirstStep,

    #[error("not signed in")]
    NotSignedIn,
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().cloned().collect::<Vec<_>>().join(", ")
}

impl WorkflowError {
    /// Message for the person driving the workflow.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFile { .. } => self.to_string(),
            Self::Decode { message, .. } => format!("Error processing file: {message}"),
            Self::EmptySheet { .. } => {
                "Error reading the Excel file. The sheet might be empty.".to_string()
            }
            Self::ParseTimeout { .. } => {
                "Checking the file took too long. Please try again.".to_string()
            }
            Self::SchemaMismatch { missing } => format!(
                "Missing required columns: {}. Please fix your file.",
                join(missing)
            ),
            Self::EmptyFile => {
                "The file appears to be empty. Please check the content and try again.".to_string()
            }
            Self::MetadataMissing(err) => err.user_message(),
            Self::NoFile => "Please upload a file first.".to_string(),
            Self::TrainingService(err) => err.message.clone(),
            Self::WrongStep { .. } | Self::AtFirstStep => self.to_string(),
            Self::Terminal => {
                "This model has been submitted. Start a new upload to train another model."
                    .to_string()
            }
            Self::NotSignedIn => {
                "You have to login to your account to train your file.".to_string()
            }
        }
    }
}

impl From<IngestError> for WorkflowError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::UnsupportedFileType { name } => Self::UnsupportedFile { name },
            IngestError::Decode { name, message } => Self::Decode { name, message },
            IngestError::EmptySheet { name } => Self::EmptySheet { name },
            IngestError::ParseTimeout { name, after } => Self::ParseTimeout { name, after },
            other @ (IngestError::Template { .. } | IngestError::Io(_)) => Self::Decode {
                name: String::new(),
                message: other.to_string(),
            },
        }
    }
}

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
