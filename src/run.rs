//! The render loop: specifiers in, annotated artifacts out.
//!
//! Documents are handled in the order given and pages in ascending index
//! order, one at a time. The first error of any kind stops the whole
//! invocation, including documents that have not been started yet.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::pages::{parse_page_ranges, PageFilter};
use crate::pipeline::input::InputSpec;
use crate::pipeline::{Document, Stages};
use crate::report::{InspectHook, NoopInspectHook, NoopReporter, PageState, RenderReporter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What one input specifier produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub path: PathBuf,
    pub page_count: usize,
    /// Zero-based indices of the rendered pages, ascending.
    pub rendered_pages: Vec<usize>,
    pub tables_found: usize,
    pub duration_ms: u64,
}

/// Drives the pipeline stages for one or more input documents.
///
/// # Example
/// ```rust,no_run
/// use pdftables_render::pipeline::{
///     annotate::GridAnnotator, document::{bind_pdfium, PdfiumReader},
///     extract::GlyphGridExtractor, format::AsciiTableFormatter, render::PdfiumRenderer, Stages,
/// };
/// use pdftables_render::{RenderConfig, RenderSession};
///
/// let pdfium = bind_pdfium().unwrap();
/// let config = RenderConfig::default();
/// let reader = PdfiumReader::new(&pdfium);
/// let renderer = PdfiumRenderer::new(&pdfium, config.max_rendered_pixels);
/// let stages = Stages {
///     reader: &reader,
///     extractor: &GlyphGridExtractor,
///     annotator: &GridAnnotator::default(),
///     renderer: &renderer,
///     formatter: &AsciiTableFormatter,
/// };
/// let summaries = RenderSession::new(&config, stages)
///     .render_all(["report.pdf:2,5-"])
///     .unwrap();
/// println!("{} pages rendered", summaries[0].rendered_pages.len());
/// ```
pub struct RenderSession<'a> {
    config: &'a RenderConfig,
    stages: Stages<'a>,
    reporter: &'a dyn RenderReporter,
    hook: Box<dyn InspectHook + 'a>,
}

impl<'a> RenderSession<'a> {
    /// A session that reports nothing and never pauses.
    pub fn new(config: &'a RenderConfig, stages: Stages<'a>) -> Self {
        Self {
            config,
            stages,
            reporter: &NoopReporter,
            hook: Box::new(NoopInspectHook),
        }
    }

    pub fn reporter(mut self, reporter: &'a dyn RenderReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Hook called after each page when `config.interactive` is set.
    pub fn inspect_hook(mut self, hook: impl InspectHook + 'a) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Render every specifier in order, stopping at the first error.
    pub fn render_all<I, S>(&mut self, specs: I) -> Result<Vec<DocumentSummary>, RenderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        specs
            .into_iter()
            .map(|spec| self.render_pdf(spec.as_ref()))
            .collect()
    }

    /// Render the selected pages of one `path` or `path:pages` specifier.
    ///
    /// # Errors
    /// * [`RenderError::OutputDirectory`] — the output directories cannot be created
    /// * [`RenderError::DocumentOpen`] — the reader cannot open `path`
    /// * [`RenderError::MalformedRangeSpec`] — the range suffix is invalid
    /// * any error raised by a pipeline stage or the inspection hook
    pub fn render_pdf(&mut self, spec: &str) -> Result<DocumentSummary, RenderError> {
        let start = Instant::now();

        // ── Step 1: Output directories ───────────────────────────────────
        self.config.output_dirs.ensure()?;

        // ── Step 2: Split specifier ──────────────────────────────────────
        let input = InputSpec::parse(spec);
        info!("Rendering {}", input);

        // ── Step 3: Open document ────────────────────────────────────────
        let reader = self.stages.reader;
        let document = reader.open(input.path())?;
        let page_count = document.page_count();

        // ── Step 4: Resolve page filter ──────────────────────────────────
        let filter = match &input.pages {
            Some(range) => parse_page_ranges(range, page_count)?,
            None => PageFilter::all(),
        };
        let missing = filter.out_of_range();
        if !missing.is_empty() {
            let shown: Vec<String> = missing.iter().map(ToString::to_string).collect();
            warn!(
                "{}: pages {} requested but the document has {} pages",
                input.path().display(),
                shown.join(","),
                page_count
            );
        }
        debug!("Selected pages: {}", filter);

        self.reporter
            .on_document_start(input.path(), page_count, &filter);

        // ── Step 5: Pages, in order ──────────────────────────────────────
        let mut summary = DocumentSummary {
            path: input.path.clone(),
            page_count,
            rendered_pages: Vec::new(),
            tables_found: 0,
            duration_ms: 0,
        };

        for index in (0..page_count).filter(|&i| filter.contains(i)) {
            summary.tables_found += self.render_page(input.path(), &*document, index)?;
            summary.rendered_pages.push(index);
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "{}: rendered {} of {} pages in {}ms",
            input.path().display(),
            summary.rendered_pages.len(),
            page_count,
            summary.duration_ms
        );
        self.reporter
            .on_document_complete(input.path(), summary.rendered_pages.len());

        Ok(summary)
    }

    /// Extract, annotate, render and report one page. Returns the number of
    /// tables found.
    fn render_page(
        &mut self,
        path: &Path,
        document: &dyn Document,
        index: usize,
    ) -> Result<usize, RenderError> {
        let page = document.page(index)?;
        let tables = self
            .stages
            .extractor
            .extract_tables(&page, &self.config.extraction)?;
        let annotation = self.stages.annotator.build_annotations(&page, &tables);
        let artifacts = self.config.output_dirs.artifact_paths(path, index);

        self.stages
            .renderer
            .render_page(path, index, &annotation, &artifacts)?;
        debug!(
            "Page {}: {} tables → {}, {}",
            index + 1,
            tables.len(),
            artifacts.svg.display(),
            artifacts.png.display()
        );
        self.reporter.on_page_rendered(index, &artifacts);

        if self.config.interactive {
            self.hook.inspect(&PageState {
                path,
                page_index: index,
                page_count: document.page_count(),
                tables: &tables,
                annotation: &annotation,
                artifacts: &artifacts,
            })?;
        }

        for (t, table) in tables.iter().enumerate() {
            if self.config.show_ascii {
                let text = self.stages.formatter.format_table(&table.data);
                self.reporter.on_table_text(index, t, &text);
            }
            if self.config.pretty_print {
                self.reporter.on_table_dump(index, t, &table.data);
            }
        }

        Ok(tables.len())
    }
}
