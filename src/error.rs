//! Error type for the pdftables-render library.
//!
//! Every failure is fatal to the whole invocation: a bad range on the second
//! document stops the run just like an unreadable first document. There is no
//! per-page error channel, so a single enum covers everything the library
//! returns. The binary wraps it in `anyhow` for context chains.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdftables-render library.
#[derive(Debug, Error)]
pub enum RenderError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The `--config` JSON could not be parsed or failed validation.
    #[error("Invalid extraction config: {detail}")]
    ConfigParse { detail: String },

    /// A token of a page-range string is not a page number or a `start-end` pair.
    #[error("Malformed range '{token}' in page spec '{spec}': {reason}")]
    MalformedRangeSpec {
        token: String,
        spec: String,
        reason: String,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document reader could not open the input file.
    #[error("Could not open PDF '{path}': {detail}")]
    DocumentOpen { path: PathBuf, detail: String },

    /// A page of an already opened document could not be loaded.
    #[error("Failed to load page {page}: {detail}")]
    PageLoad { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    // ── Output errors ─────────────────────────────────────────────────────
    /// An output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An SVG or PNG artifact could not be produced or written.
    #[error("Failed to render '{path}': {detail}")]
    Render { path: PathBuf, detail: String },

    // ── Control flow ──────────────────────────────────────────────────────
    /// The operator quit from the interactive inspection prompt.
    #[error("Aborted by operator")]
    Aborted,

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RenderError {
    pub(crate) fn malformed(token: &str, spec: &str, reason: impl Into<String>) -> Self {
        RenderError::MalformedRangeSpec {
            token: token.to_string(),
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}
