//! Reporting and inspection seams of the render loop.
//!
//! The orchestrator never prints. Everything an operator sees goes through a
//! [`RenderReporter`], and the interactive pause is an [`InspectHook`]. The
//! CLI supplies terminal implementations; tests supply recording ones.
//!
//! # Example
//!
//! ```rust
//! use pdftables_render::{ArtifactPaths, RenderReporter};
//! use std::cell::RefCell;
//!
//! #[derive(Default)]
//! struct Collect {
//!     rendered: RefCell<Vec<usize>>,
//! }
//!
//! impl RenderReporter for Collect {
//!     fn on_page_rendered(&self, page_index: usize, _artifacts: &ArtifactPaths) {
//!         self.rendered.borrow_mut().push(page_index);
//!     }
//! }
//! ```

use crate::error::RenderError;
use crate::model::{Annotation, TableContainer, TableData};
use crate::output::ArtifactPaths;
use crate::pages::PageFilter;
use std::io::{BufRead, Write};
use std::path::Path;

/// Receives progress and table output from the render loop.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The loop is single-threaded, so implementations may
/// use `Cell`/`RefCell` for their own state.
pub trait RenderReporter {
    /// Called once a document is open and its page filter resolved.
    ///
    /// # Arguments
    /// * `path`       — the PDF path (without the range suffix)
    /// * `page_count` — total pages in the document
    /// * `filter`     — the selected pages; empty for all
    fn on_document_start(&self, path: &Path, page_count: usize, filter: &PageFilter) {
        let _ = (path, page_count, filter);
    }

    /// Called after both artifacts of a page were written.
    ///
    /// # Arguments
    /// * `page_index` — zero-based page index
    /// * `artifacts`  — the SVG and PNG paths
    fn on_page_rendered(&self, page_index: usize, artifacts: &ArtifactPaths) {
        let _ = (page_index, artifacts);
    }

    /// ASCII rendering of one table, when `show_ascii` is set.
    fn on_table_text(&self, page_index: usize, table_index: usize, text: &str) {
        let _ = (page_index, table_index, text);
    }

    /// Structured dump of one table's cells, when `pretty_print` is set.
    fn on_table_dump(&self, page_index: usize, table_index: usize, data: &TableData) {
        let _ = (page_index, table_index, data);
    }

    /// Called after the last selected page of a document.
    ///
    /// # Arguments
    /// * `path`     — the PDF path
    /// * `rendered` — number of pages rendered
    fn on_document_complete(&self, path: &Path, rendered: usize) {
        let _ = (path, rendered);
    }
}

/// A reporter that discards everything. The default.
pub struct NoopReporter;

impl RenderReporter for NoopReporter {}

/// Snapshot handed to the [`InspectHook`] after a page is rendered.
#[derive(Debug, Clone, Copy)]
pub struct PageState<'a> {
    pub path: &'a Path,
    pub page_index: usize,
    pub page_count: usize,
    pub tables: &'a TableContainer,
    pub annotation: &'a Annotation,
    pub artifacts: &'a ArtifactPaths,
}

/// Operator-driven pause after each page in interactive mode.
///
/// The call blocks the whole run until it returns. Returning an error (usually
/// [`RenderError::Aborted`]) stops the invocation.
pub trait InspectHook {
    fn inspect(&mut self, state: &PageState<'_>) -> Result<(), RenderError>;
}

/// Continues immediately. The default hook.
pub struct NoopInspectHook;

impl InspectHook for NoopInspectHook {
    fn inspect(&mut self, _state: &PageState<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Line-oriented operator prompt: the CLI's interactive pause.
///
/// After each page it writes a one-line summary and reads commands until one
/// ends the pause:
///
/// * empty line: continue with the next page
/// * `t`: write the page's tables as JSON, then ask again
/// * `q`: abort the run with [`RenderError::Aborted`]
///
/// End of input continues, so piped invocations never hang. The binary reads
/// from stdin; tests hand in any [`BufRead`].
pub struct StdinInspectHook<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdinInspectHook<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> InspectHook for StdinInspectHook<R, W> {
    fn inspect(&mut self, state: &PageState<'_>) -> Result<(), RenderError> {
        let shapes: Vec<String> = state
            .tables
            .iter()
            .map(|t| format!("{}x{}", t.row_count(), t.column_count()))
            .collect();
        writeln!(
            self.output,
            "page {}/{} of {}: {} tables [{}]  {}",
            state.page_index + 1,
            state.page_count,
            state.path.display(),
            state.tables.len(),
            shapes.join(", "),
            state.artifacts.svg.display()
        )
        .map_err(prompt_err)?;

        loop {
            write!(self.output, "[Enter] continue  [t] tables as JSON  [q] quit > ")
                .map_err(prompt_err)?;
            self.output.flush().map_err(prompt_err)?;

            let mut line = String::new();
            if self.input.read_line(&mut line).map_err(prompt_err)? == 0 {
                return Ok(());
            }

            match line.trim() {
                "" => return Ok(()),
                "q" | "Q" => return Err(RenderError::Aborted),
                "t" | "T" => {
                    let json = serde_json::to_string_pretty(state.tables)
                        .map_err(|e| RenderError::Internal(e.to_string()))?;
                    writeln!(self.output, "{json}").map_err(prompt_err)?;
                }
                other => writeln!(self.output, "unknown command '{other}'").map_err(prompt_err)?,
            }
        }
    }
}

fn prompt_err(e: std::io::Error) -> RenderError {
    RenderError::Internal(format!("operator prompt: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;
    use std::cell::Cell;
    use std::path::PathBuf;

    struct CountingReporter {
        pages: Cell<usize>,
        tables: Cell<usize>,
    }

    impl RenderReporter for CountingReporter {
        fn on_page_rendered(&self, _page_index: usize, _artifacts: &ArtifactPaths) {
            self.pages.set(self.pages.get() + 1);
        }

        fn on_table_text(&self, _page_index: usize, _table_index: usize, _text: &str) {
            self.tables.set(self.tables.get() + 1);
        }
    }

    fn artifacts() -> ArtifactPaths {
        ArtifactPaths {
            svg: PathBuf::from("svg/a.pdf_00.svg"),
            png: PathBuf::from("png/a.pdf_00.png"),
        }
    }

    #[test]
    fn noop_reporter_does_not_panic() {
        let r = NoopReporter;
        r.on_document_start(Path::new("a.pdf"), 3, &PageFilter::all());
        r.on_page_rendered(0, &artifacts());
        r.on_table_text(0, 0, "+--+");
        r.on_table_dump(0, 0, &vec![vec!["x".to_string()]]);
        r.on_document_complete(Path::new("a.pdf"), 1);
    }

    #[test]
    fn overridden_methods_receive_events() {
        let r = CountingReporter {
            pages: Cell::new(0),
            tables: Cell::new(0),
        };
        r.on_page_rendered(0, &artifacts());
        r.on_page_rendered(1, &artifacts());
        r.on_table_text(1, 0, "t");
        r.on_table_dump(1, 0, &Vec::new());
        assert_eq!(r.pages.get(), 2);
        assert_eq!(r.tables.get(), 1);
    }

    #[test]
    fn noop_hook_continues() {
        let tables = TableContainer::default();
        let annotation = Annotation::default();
        let artifacts = artifacts();
        let state = PageState {
            path: Path::new("a.pdf"),
            page_index: 0,
            page_count: 1,
            tables: &tables,
            annotation: &annotation,
            artifacts: &artifacts,
        };
        assert!(NoopInspectHook.inspect(&state).is_ok());
    }

    /// Run the stdin hook once on a page with one 2x2 table.
    fn prompt(input: &str) -> (Result<(), RenderError>, String) {
        let tables = TableContainer {
            page_index: 1,
            tables: vec![Table {
                data: vec![
                    vec!["Name".into(), "Qty".into()],
                    vec!["apple".into(), "3".into()],
                ],
                ..Table::default()
            }],
        };
        let annotation = Annotation::default();
        let artifacts = artifacts();
        let state = PageState {
            path: Path::new("a.pdf"),
            page_index: 1,
            page_count: 4,
            tables: &tables,
            annotation: &annotation,
            artifacts: &artifacts,
        };

        let mut output = Vec::new();
        let result = StdinInspectHook::new(input.as_bytes(), &mut output).inspect(&state);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn enter_continues() {
        let (result, output) = prompt("\n");
        assert!(result.is_ok());
        assert!(output.starts_with("page 2/4 of a.pdf: 1 tables [2x2]"), "got: {output}");
        assert!(!output.contains("apple"));
    }

    #[test]
    fn q_aborts() {
        let (result, _) = prompt("q\n");
        assert!(matches!(result, Err(RenderError::Aborted)));
    }

    #[test]
    fn t_dumps_tables_then_waits_again() {
        let (result, output) = prompt("t\n\n");
        assert!(result.is_ok());
        assert!(output.contains("\"apple\""), "got: {output}");
        assert_eq!(output.matches("[q] quit").count(), 2);
    }

    #[test]
    fn end_of_input_continues() {
        let (result, _) = prompt("");
        assert!(result.is_ok());
    }

    #[test]
    fn unknown_command_asks_again() {
        let (result, output) = prompt("x\nq\n");
        assert!(matches!(result, Err(RenderError::Aborted)));
        assert!(output.contains("unknown command 'x'"));
    }
}
