//! Format sniffing and text decoding.

use std::borrow::Cow;

use breath_model::FileKind;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// ZIP local file header, the container of `.xlsx` workbooks.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
/// Compound File Binary header used by legacy `.xls` workbooks.
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Identifies the container from its leading bytes.
///
/// Browsers commonly declare CSV files as `application/vnd.ms-excel`, so the
/// bytes decide. Anything without a spreadsheet signature is treated as text.
pub fn sniff_kind(bytes: &[u8]) -> FileKind {
    if bytes.starts_with(&ZIP_MAGIC) {
        FileKind::SpreadsheetXml
    } else if bytes.starts_with(&CFB_MAGIC) {
        FileKind::LegacySpreadsheet
    } else {
        FileKind::DelimitedText
    }
}

/// Decoded text plus the encoding that produced it.
#[derive(Debug)]
pub struct DecodedText<'a> {
    pub text: Cow<'a, str>,
    pub encoding: &'static Encoding,
}

/// Decodes delimited text.
///
/// Order: byte-order mark (UTF-8, UTF-16LE, UTF-16BE), strict UTF-8, then
/// Windows-1252 as used by spreadsheet exports. Returns `None` for binary
/// data (decoded text containing NUL).
pub fn decode_text(bytes: &[u8]) -> Option<DecodedText<'_>> {
    let (text, encoding) = if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            return None;
        }
        (text, encoding)
    } else if let Ok(text) = std::str::from_utf8(bytes) {
        (Cow::Borrowed(text), UTF_8)
    } else {
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        (text, WINDOWS_1252)
    };

    if text.contains('\0') {
        return None;
    }
    Some(DecodedText { text, encoding })
}
