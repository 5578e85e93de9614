//! Upload ingestion for the retraining workflow.
//!
//! Turns a selected file into a [`ParsedTable`](breath_model::ParsedTable):
//!
//! - [`admit`] filters uploads to CSV, XLS and XLSX before any bytes are read
//! - [`parse`] sniffs the container and decodes delimited text or the first
//!   worksheet of a workbook
//! - [`parse_with_timeout`] bounds how long a caller waits for a parse
//! - [`write_template_xlsx`] and [`write_template_csv`] export the empty
//!   training template

pub mod csv;
pub mod decode;
pub mod error;
pub mod gate;
pub mod grid;
pub mod parse;
pub mod sheet;
pub mod template;

pub use decode::{DecodedText, decode_text, sniff_kind};
pub use error::{IngestError, Result};
pub use gate::{admit, admit_file};
pub use parse::{DEFAULT_PARSE_TIMEOUT, parse, parse_with_timeout};
pub use template::{
    TEMPLATE_FILE_NAME, TEMPLATE_SHEET_NAME, TemplateFormat, write_template_csv,
    write_template_xlsx, write_workbook,
};
