//! Pipeline stages the render loop drives for every selected page.
//!
//! Each stage is a trait so the loop in [`crate::run`] stays independent
//! of pdfium and of any particular table-detection algorithm. The submodules
//! hold the baseline implementations the binary uses.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ document ──▶ extract ──▶ annotate ──▶ render ──▶ format
//! (path:pages) (pdfium)   (tables)    (overlay)    (svg+png)  (ascii)
//! ```
//!
//! 1. [`input`]    — split `path:pages` specifiers
//! 2. [`document`] — open the PDF and load page text with pdfium
//! 3. [`extract`]  — cluster glyphs into a [`TableContainer`]
//! 4. [`annotate`] — turn tables into overlay shapes
//! 5. [`render`]   — rasterise the page, draw the overlay, write SVG and PNG
//! 6. [`format`]   — ASCII rendering of table data for the terminal

pub mod annotate;
pub mod document;
pub mod extract;
pub mod format;
pub mod input;
pub mod render;

use crate::config::ExtractionConfig;
use crate::error::RenderError;
use crate::model::{Annotation, PageContent, TableContainer, TableData};
use crate::output::ArtifactPaths;
use std::path::Path;

/// Opens PDF files.
pub trait DocumentReader {
    /// # Errors
    /// [`RenderError::DocumentOpen`] when the file is missing, unreadable or
    /// not a PDF.
    fn open(&self, path: &Path) -> Result<Box<dyn Document + '_>, RenderError>;
}

/// An opened PDF.
pub trait Document {
    fn page_count(&self) -> usize;

    /// Load zero-based page `index`.
    fn page(&self, index: usize) -> Result<PageContent, RenderError>;
}

/// Finds tables on a page.
pub trait TableExtractor {
    fn extract_tables(
        &self,
        page: &PageContent,
        config: &ExtractionConfig,
    ) -> Result<TableContainer, RenderError>;
}

/// Derives the overlay drawn over a page from its tables.
pub trait Annotator {
    fn build_annotations(&self, page: &PageContent, tables: &TableContainer) -> Annotation;
}

/// Writes the SVG and PNG artifacts of one page.
pub trait PageRenderer {
    fn render_page(
        &self,
        pdf_path: &Path,
        page_index: usize,
        annotation: &Annotation,
        artifacts: &ArtifactPaths,
    ) -> Result<(), RenderError>;
}

/// Renders table data as text for the terminal.
pub trait TableFormatter {
    fn format_table(&self, data: &TableData) -> String;
}

/// The collaborators one render run uses.
pub struct Stages<'a> {
    pub reader: &'a dyn DocumentReader,
    pub extractor: &'a dyn TableExtractor,
    pub annotator: &'a dyn Annotator,
    pub renderer: &'a dyn PageRenderer,
    pub formatter: &'a dyn TableFormatter,
}
