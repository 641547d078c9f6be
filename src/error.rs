//! Error types for the edgequake-pdf2insight library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`InsightError`] — **Fatal**: the analysis cannot proceed at all
//!   (bad input file, PDFium missing, output directory not writable).
//!   Returned as `Err(InsightError)` from the top-level `analyze*` functions.
//!
//! * [`ItemError`] — **Non-fatal**: a single sentence or image failed
//!   (translation timeout, undecodable bitmap). The item is dropped, the
//!   failure is counted in [`crate::output::AnalysisStats`], and the run
//!   continues with the next item.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2insight library.
#[derive(Debug, Error)]
pub enum InsightError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is neither a file path nor an HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The PDFium library could not be located, downloaded or bound.
    #[error(
        "PDFium engine unavailable: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the download failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    EngineUnavailable(String),

    // ── Resource errors ───────────────────────────────────────────────────
    /// A user-supplied stopword file could not be read.
    #[error("Failed to read stopword file '{path}': {source}")]
    StopwordsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory or write a file into it.
    #[error("Failed to write output '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet writer rejected the data.
    #[error("Failed to build spreadsheet '{path}': {detail}")]
    WorkbookFailed { path: PathBuf, detail: String },

    /// A chart image could not be encoded.
    #[error("Failed to render chart '{path}': {detail}")]
    ChartFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single sentence or image.
///
/// Never propagated out of a stage: the item is skipped and the failure is
/// tallied so the final report can say how much was dropped.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemError {
    /// Network-level translation failure (timeout, connection reset, HTTP 429/5xx).
    #[error("translation temporarily failed: {detail}")]
    TranslationTransient { detail: String },

    /// Translation service answered but the answer was unusable.
    #[error("translation failed: {detail}")]
    TranslationFailed { detail: String },

    /// The sentiment scorer could not score the translated text.
    #[error("scoring failed: {detail}")]
    ScoringFailed { detail: String },

    /// An embedded image could not be measured or decoded.
    #[error("Page {page}: image extraction failed: {detail}")]
    ImageFailed { page: usize, detail: String },
}

impl ItemError {
    /// `true` for failures that would likely succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ItemError::TranslationTransient { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_pdf_display() {
        let e = InsightError::NotAPdf {
            path: PathBuf::from("/tmp/x.txt"),
            magic: *b"HELL",
        };
        assert!(e.to_string().contains("/tmp/x.txt"));
    }

    #[test]
    fn engine_unavailable_mentions_override() {
        let e = InsightError::EngineUnavailable("no such file".into());
        let msg = e.to_string();
        assert!(msg.contains("no such file"));
        assert!(msg.contains("PDFIUM_LIB_PATH"));
    }

    #[test]
    fn transient_classification() {
        let t = ItemError::TranslationTransient {
            detail: "HTTP 503".into(),
        };
        let p = ItemError::TranslationFailed {
            detail: "empty response".into(),
        };
        assert!(t.is_transient());
        assert!(!p.is_transient());
        assert!(!ItemError::ScoringFailed { detail: "x".into() }.is_transient());
    }

    #[test]
    fn image_failed_display() {
        let e = ItemError::ImageFailed {
            page: 4,
            detail: "bad bitmap".into(),
        };
        assert!(e.to_string().contains("Page 4"));
    }
}
