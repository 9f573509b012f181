//! # pdftables-render
//!
//! Debug renderer for PDF table extraction.
//!
//! ## Why this crate?
//!
//! Table extractors fail quietly: a column boundary lands one glyph too far
//! left, a header row is merged into the body, a footnote becomes a table.
//! Looking at the extracted cells alone rarely tells you *why*. This crate
//! runs the extractor on each selected page and writes the page back out with
//! the detected table geometry drawn on top, so you can see exactly what the
//! algorithm clustered.
//!
//! ## Pipeline Overview
//!
//! ```text
//! path[:pages]
//!  │
//!  ├─ 1. Provision  create svg/ and png/ output directories
//!  ├─ 2. Input      split the specifier, open the PDF via pdfium
//!  ├─ 3. Select     parse "1,3-5,8-" into a page filter
//!  ├─ 4. Extract    cluster page glyphs into tables
//!  ├─ 5. Annotate   table bounds, column and row edges, glyph boxes
//!  ├─ 6. Render     <name>_NN.svg + <name>_NN.png per page
//!  └─ 7. Report     optional ASCII grid / debug dump / interactive pause
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pdftables_render::{parse_page_ranges, OutputDirs};
//! use std::path::Path;
//!
//! // Pages 1, 3, 4 and 5 through the end of a 10-page document.
//! let filter = parse_page_ranges("1,3-4,5-", 10).unwrap();
//! assert!(filter.contains(0));
//! assert!(!filter.contains(1));
//! assert!(filter.contains(9));
//!
//! let paths = OutputDirs::default().artifact_paths(Path::new("report.pdf"), 2);
//! assert_eq!(paths.svg, Path::new("svg/report.pdf_02.svg"));
//! ```
//!
//! See [`RenderSession`] for driving the full pipeline.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdftables-render` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdftables-render = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod pages;
pub mod pipeline;
pub mod report;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, RenderConfig, RenderConfigBuilder};
pub use error::RenderError;
pub use model::{
    Annotation, AnnotationKind, AnnotationShape, Glyph, PageContent, Rect, Table, TableContainer,
    TableData,
};
pub use output::{ArtifactPaths, OutputDirs};
pub use pages::{parse_page_ranges, PageFilter, RangeToken};
pub use report::{
    InspectHook, NoopInspectHook, NoopReporter, PageState, RenderReporter, StdinInspectHook,
};
pub use run::{DocumentSummary, RenderSession};
