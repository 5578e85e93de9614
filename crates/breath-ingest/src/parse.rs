//! Tabular parser entry points.

use std::thread;
use std::time::{Duration, Instant};

use breath_model::{FileKind, ParsedTable, UploadedFile};
use crossbeam_channel::{RecvTimeoutError, bounded};

use crate::csv::read_csv_bytes;
use crate::decode::sniff_kind;
use crate::error::{IngestError, Result};
use crate::sheet::read_sheet_bytes;

/// Bounded wait applied to a parse before the loading state is cleared.
pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Decodes an admitted upload into a [`ParsedTable`].
///
/// The container is identified from the leading bytes; the declared MIME type
/// only matters to the upload gate.
pub fn parse(file: &UploadedFile) -> Result<ParsedTable> {
    let sniffed = sniff_kind(file.bytes());
    let declared = FileKind::from_mime(file.mime());
    if declared.is_some_and(|kind| kind != sniffed) {
        tracing::debug!(
            file = %file.name(),
            declared = %file.mime(),
            sniffed = %sniffed,
            "declared type differs from file contents"
        );
    }

    let span = tracing::debug_span!("parse", file = %file.name(), kind = %sniffed);
    let _guard = span.enter();
    let start = Instant::now();

    let table = match sniffed {
        FileKind::DelimitedText => read_csv_bytes(file.name(), file.bytes())?,
        FileKind::LegacySpreadsheet | FileKind::SpreadsheetXml => {
            read_sheet_bytes(file.name(), file.bytes())?
        }
    };

    tracing::info!(
        rows = table.height(),
        columns = table.width(),
        duration_ms = start.elapsed().as_millis(),
        "parsed upload"
    );
    Ok(table)
}

/// Runs [`parse`] on a worker thread and waits at most `timeout` for it.
///
/// On expiry the caller gets [`IngestError::ParseTimeout`]; the worker keeps
/// running in the background and its result is dropped.
pub fn parse_with_timeout(file: &UploadedFile, timeout: Duration) -> Result<ParsedTable> {
    let (tx, rx) = bounded(1);
    let worker_file = file.clone();

    thread::Builder::new()
        .name("breath-parse".to_string())
        .spawn(move || {
            // The receiver may have given up already.
            let _ = tx.send(parse(&worker_file));
        })?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(
                file = %file.name(),
                timeout_ms = timeout.as_millis(),
                "parse timed out"
            );
            Err(IngestError::ParseTimeout {
                name: file.name().to_string(),
                after: timeout,
            })
        }
        Err(RecvTimeoutError::Disconnected) => Err(IngestError::decode(
            file.name(),
            "parser stopped before producing a result",
        )),
    }
}
