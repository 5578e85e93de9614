//! Uploaded file blobs and their declared tabular kind.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{ModelError, Result};

/// MIME type for comma-separated text.
pub const MIME_CSV: &str = "text/csv";
/// MIME type for the legacy binary spreadsheet format.
pub const MIME_XLS: &str = "application/vnd.ms-excel";
/// MIME type for the XML-zip spreadsheet container.
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Tabular formats accepted by the upload gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Comma-separated text.
    DelimitedText,
    /// Legacy compound-document spreadsheet (`.xls`).
    LegacySpreadsheet,
    /// Office Open XML spreadsheet (`.xlsx`).
    SpreadsheetXml,
}

impl FileKind {
    /// Resolves a declared MIME type. Parameters such as `; charset=` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(MIME_CSV) {
            Some(Self::DelimitedText)
        } else if essence.eq_ignore_ascii_case(MIME_XLS) {
            Some(Self::LegacySpreadsheet)
        } else if essence.eq_ignore_ascii_case(MIME_XLSX) {
            Some(Self::SpreadsheetXml)
        } else {
            None
        }
    }

    /// Resolves a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::DelimitedText),
            "xls" => Some(Self::LegacySpreadsheet),
            "xlsx" => Some(Self::SpreadsheetXml),
            _ => None,
        }
    }

    /// Resolves the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::DelimitedText => MIME_CSV,
            Self::LegacySpreadsheet => MIME_XLS,
            Self::SpreadsheetXml => MIME_XLSX,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DelimitedText => "csv",
            Self::LegacySpreadsheet => "xls",
            Self::SpreadsheetXml => "xlsx",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A file selected for upload, held in memory.
///
/// The bytes are shared so workflow states holding the same file can be
/// cloned without copying the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, declaring the MIME type implied by its extension.
    ///
    /// Unknown extensions get `application/octet-stream` so the upload gate
    /// can reject them with the file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime = FileKind::from_file_name(&name)
            .map(FileKind::mime)
            .unwrap_or("application/octet-stream");
        Ok(Self::new(name, mime, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 of the payload, hex encoded.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes[..]))
    }

    /// Size in megabytes with two decimals, as shown next to the file name.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.bytes.len() as f64 / 1024.0 / 1024.0)
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime_ignores_parameters() {
        assert_eq!(
            FileKind::from_mime("text/csv; charset=utf-8"),
            Some(FileKind::DelimitedText)
        );
        assert_eq!(FileKind::from_mime(MIME_XLSX), Some(FileKind::SpreadsheetXml));
        assert_eq!(FileKind::from_mime("image/png"), None);
    }

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(
            FileKind::from_file_name("visits 270723 deident.XLSX"),
            Some(FileKind::SpreadsheetXml)
        );
        assert_eq!(FileKind::from_file_name("old.xls"), Some(FileKind::LegacySpreadsheet));
        assert_eq!(FileKind::from_file_name("lakitus-cloud.png"), None);
        assert_eq!(FileKind::from_file_name("no_extension"), None);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = UploadedFile::new("a.csv", MIME_CSV, b"x,y\n".to_vec());
        let b = UploadedFile::new("b.csv", MIME_CSV, b"x,y\n".to_vec());
        let c = UploadedFile::new("a.csv", MIME_CSV, b"x,z\n".to_vec());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_debug_omits_payload() {
        let file = UploadedFile::new("a.csv", MIME_CSV, b"secret".to_vec());
        let debug = format!("{file:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("len: 6"));
    }
}
