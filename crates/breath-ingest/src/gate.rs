//! Upload gate: only CSV, XLS and XLSX files reach the parser.

use breath_model::{FileKind, UploadedFile};

use crate::error::{IngestError, Result};

/// Decides whether a selected file may be parsed.
///
/// A declared MIME type wins; without one (or with a generic
/// `application/octet-stream`) the file extension decides.
pub fn admit(name: &str, declared_mime: Option<&str>) -> Result<FileKind> {
    let declared = declared_mime
        .map(str::trim)
        .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case("application/octet-stream"));

    let kind = match declared {
        Some(mime) => FileKind::from_mime(mime),
        None => FileKind::from_file_name(name),
    };

    match kind {
        Some(kind) => {
            tracing::debug!(file = %name, kind = %kind, "upload admitted");
            Ok(kind)
        }
        None => {
            tracing::warn!(file = %name, mime = ?declared_mime, "upload rejected");
            Err(IngestError::UnsupportedFileType {
                name: name.to_string(),
            })
        }
    }
}

/// Runs [`admit`] on an in-memory upload.
pub fn admit_file(file: &UploadedFile) -> Result<FileKind> {
    admit(file.name(), Some(file.mime()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use breath_model::{MIME_CSV, MIME_XLS, MIME_XLSX};

    #[test]
    fn test_admits_supported_mime_types() {
        assert_eq!(admit("a.csv", Some(MIME_CSV)).unwrap(), FileKind::DelimitedText);
        assert_eq!(admit("a.xls", Some(MIME_XLS)).unwrap(), FileKind::LegacySpreadsheet);
        assert_eq!(admit("a.xlsx", Some(MIME_XLSX)).unwrap(), FileKind::SpreadsheetXml);
    }

    #[test]
    fn test_rejects_by_mime_even_with_good_extension() {
        let err = admit("renamed.csv", Some("image/png")).unwrap_err();
        assert_eq!(err.to_string(), "renamed.csv is not an xlsx, xls, or csv file");
    }

    #[test]
    fn test_falls_back_to_extension() {
        assert_eq!(admit("data.CSV", None).unwrap(), FileKind::DelimitedText);
        assert_eq!(
            admit("data.xlsx", Some("application/octet-stream")).unwrap(),
            FileKind::SpreadsheetXml
        );
        assert!(matches!(
            admit("lakitus-cloud.png", None),
            Err(IngestError::UnsupportedFileType { .. })
        ));
    }
}
