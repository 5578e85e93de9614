//! Error types for upload ingestion.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while admitting, decoding or exporting tabular files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Upload Gate ===
    /// File type is not CSV, XLS or XLSX.
    #[error("{name} is not an xlsx, xls, or csv file")]
    UnsupportedFileType { name: String },

    // === Decoding ===
    /// Bytes are not a recognizable delimited-text or spreadsheet format.
    #[error("failed to decode {name}: {message}")]
    Decode { name: String, message: String },

    /// The first sheet has no addressable cell range.
    #[error("{name} has no readable cells in its first sheet")]
    EmptySheet { name: String },

    /// Parsing did not finish within the bounded wait.
    #[error("parsing {name} did not finish within {}s", .after.as_secs_f32())]
    ParseTimeout { name: String, after: Duration },

    // === Template Export ===
    /// Failed to assemble the template workbook.
    #[error("failed to write template: {message}")]
    Template { message: String },

    /// I/O error while writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub(crate) fn decode(name: &str, message: impl std::fmt::Display) -> Self {
        Self::Decode {
            name: name.to_string(),
            message: message.to_string(),
        }
    }

    /// Message shown to the person who selected the file.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFileType { .. } => self.to_string(),
            Self::Decode { message, .. } => format!("Error processing file: {message}"),
            Self::EmptySheet { .. } => {
                "Error reading the Excel file. The sheet might be empty.".to_string()
            }
            Self::ParseTimeout { .. } => {
                "Checking the file took too long. Please try again.".to_string()
            }
            Self::Template { .. } | Self::Io(_) => {
                "Could not create the template file.".to_string()
            }
        }
    }
}

impl From<zip::result::ZipError> for IngestError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Template {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for IngestError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Template {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::UnsupportedFileType {
            name: "lakitus-cloud.png".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "lakitus-cloud.png is not an xlsx, xls, or csv file"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = IngestError::ParseTimeout {
            name: "visits.xlsx".to_string(),
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "parsing visits.xlsx did not finish within 5s");
    }

    #[test]
    fn test_error_from_zip() {
        let err: IngestError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, IngestError::Template { .. }));
    }
}
