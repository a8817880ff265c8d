//! Document text extraction.
//!
//! Converts uploaded file bytes into plain text for prompt grounding.
//! The format is resolved once from the filename extension at ingestion
//! time; a parse failure inside a supported format degrades to empty
//! text rather than aborting the conversation.

use calamine::Reader;
use std::io::Cursor;
use thiserror::Error;
use tracing::warn;

/// Document format resolved from the declared filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// PDF document.
    Pdf,
    /// Excel spreadsheet (`.xls` or `.xlsx`).
    Spreadsheet,
    /// Anything else; acknowledged but never ingested.
    Unsupported,
}

impl DocumentFormat {
    /// Resolve the format from a filename extension, case-insensitively.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Self::Pdf,
            "xls" | "xlsx" => Self::Spreadsheet,
            _ => Self::Unsupported,
        }
    }
}

/// Errors surfaced by the extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file extension maps to no known handler. The caller must
    /// acknowledge receipt without ingesting and must not ground a
    /// prompt on it.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Extract plain text from document bytes.
///
/// Returns the full extracted text; truncation for prompting is the
/// caller's job. Parse failures inside a supported format return an
/// empty string, not an error.
///
/// # Errors
///
/// Returns `ExtractError::UnsupportedFormat` for [`DocumentFormat::Unsupported`].
pub fn extract(bytes: &[u8], format: DocumentFormat, filename: &str) -> Result<String, ExtractError> {
    match format {
        DocumentFormat::Pdf => Ok(extract_pdf(bytes, filename)),
        DocumentFormat::Spreadsheet => Ok(extract_spreadsheet(bytes, filename)),
        DocumentFormat::Unsupported => {
            Err(ExtractError::UnsupportedFormat(filename.to_string()))
        }
    }
}

/// Extract text from a PDF. Pages without extractable text (scanned
/// images) contribute nothing; a failed parse yields an empty string.
fn extract_pdf(bytes: &[u8], filename: &str) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(filename, error = %e, "PDF extraction failed, degrading to empty text");
            String::new()
        }
    }
}

/// Render the first worksheet as a tab-separated plain-text table.
/// Exact formatting is not contractual beyond being readable.
fn extract_spreadsheet(bytes: &[u8], filename: &str) -> String {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = match calamine::open_workbook_auto_from_rs(cursor) {
        Ok(workbook) => workbook,
        Err(e) => {
            warn!(filename, error = %e, "Spreadsheet open failed, degrading to empty text");
            return String::new();
        }
    };

    let Some(range) = workbook.worksheet_range_at(0) else {
        warn!(filename, "Spreadsheet has no worksheets");
        return String::new();
    };
    let range = match range {
        Ok(range) => range,
        Err(e) => {
            warn!(filename, error = %e, "Worksheet read failed, degrading to empty text");
            return String::new();
        }
    };

    let mut out = String::new();
    for row in range.rows() {
        let line: Vec<String> = row.iter().map(ToString::to_string).collect();
        out.push_str(&line.join("\t"));
        out.push('\n');
    }
    out
}
