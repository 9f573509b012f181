//! CLI binary for pdftables-render.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RenderConfig`, wires the pdfium-backed pipeline stages and prints what
//! the render loop reports.

use anyhow::{Context, Result};
use clap::Parser;
use pdftables_render::pipeline::{
    annotate::GridAnnotator,
    document::{bind_pdfium, PdfiumReader},
    extract::GlyphGridExtractor,
    format::AsciiTableFormatter,
    render::PdfiumRenderer,
    Stages,
};
use pdftables_render::{
    ArtifactPaths, ExtractionConfig, PageFilter, RenderConfig, RenderReporter, RenderSession,
    StdinInspectHook, TableData,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Terminal reporter ────────────────────────────────────────────────────────

/// Prints artifact paths and table output to stdout.
///
/// `--quiet` silences the per-page lines but never the tables: `-a` and `-p`
/// are explicit requests for output.
struct CliReporter {
    quiet: bool,
}

impl RenderReporter for CliReporter {
    fn on_document_start(&self, path: &Path, page_count: usize, filter: &PageFilter) {
        if !self.quiet {
            eprintln!(
                "{} {}  {}",
                cyan("◆"),
                bold(&path.display().to_string()),
                dim(&format!("{page_count} pages, selected: {filter}"))
            );
        }
    }

    fn on_page_rendered(&self, _page_index: usize, artifacts: &ArtifactPaths) {
        if !self.quiet {
            println!(
                "Rendered {} {}",
                artifacts.svg.display(),
                artifacts.png.display()
            );
        }
    }

    fn on_table_text(&self, page_index: usize, table_index: usize, text: &str) {
        println!(
            "{}",
            dim(&format!("page {} table {}", page_index + 1, table_index + 1))
        );
        println!("{text}");
    }

    fn on_table_dump(&self, page_index: usize, table_index: usize, data: &TableData) {
        println!(
            "{}",
            dim(&format!("page {} table {}", page_index + 1, table_index + 1))
        );
        println!("{data:#?}");
    }

    fn on_document_complete(&self, path: &Path, rendered: usize) {
        if !self.quiet {
            eprintln!(
                "{} {} pages rendered from {}",
                green("✔"),
                bold(&rendered.to_string()),
                path.display()
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render every page of a document into ./svg and ./png
  pdftables-render statement.pdf

  # Pages 2, and 5 through the end
  pdftables-render "statement.pdf:2,5-"

  # Several documents, artifacts under debug/
  pdftables-render -O debug a.pdf b.pdf:1-3

  # Show the extracted tables and tune the extractor
  pdftables-render -a -c '{"n_glyph_column_threshold": 2, "table_top_hint": "Date"}' statement.pdf

  # Step through pages one at a time
  pdftables-render -i statement.pdf

PAGE RANGES:
  Appended to the path after the last ':'. Comma-separated 1-based pages or
  spans: "3", "1-4", "7-" (to the end), "1,4-6,9-".

OUTPUT:
  svg/<file>_NN.svg   page raster + vector overlay
  png/<file>_NN.png   page raster with the overlay drawn in
  NN is the zero-based page index, at least two digits.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH     Path to libpdfium (file or directory)
  RUST_LOG            Override the log filter (e.g. pdftables_render=debug)
"#;

/// Render PDF pages with the detected table geometry drawn on top.
#[derive(Parser, Debug)]
#[command(
    name = "pdftables-render",
    version,
    about = "Debug renderer for PDF table extraction",
    long_about = "Run table extraction on the selected pages of one or more PDFs and write each \
page as an SVG and a PNG with table bounds, column edges and row edges drawn on top.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files, each optionally suffixed with a page range (path:1,3-5).
    #[arg(required = true)]
    pdfpath: Vec<String>,

    /// Additional debug information (parsed arguments, DEBUG logs).
    #[arg(short = 'D', long, env = "PDFTABLES_DEBUG")]
    debug: bool,

    /// Directory to write svg/ and png/ into. Default: current directory.
    #[arg(short = 'O', long, env = "PDFTABLES_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Show ascii table.
    #[arg(short, long, env = "PDFTABLES_ASCII")]
    ascii: bool,

    /// Pretty-print the table data.
    #[arg(short, long, env = "PDFTABLES_PPRINT")]
    pprint: bool,

    /// Pause after every page for inspection.
    #[arg(short, long, env = "PDFTABLES_INTERACTIVE")]
    interactive: bool,

    /// JSON object of extraction parameters.
    #[arg(
        short,
        long,
        env = "PDFTABLES_CONFIG",
        long_help = "JSON object of extraction parameters. Keys: n_glyph_column_threshold, \
          n_glyph_row_threshold, table_top_hint, table_bottom_hint, atomise, extend_y.\n\
          Unknown keys are rejected."
    )]
    config: Option<String>,

    /// Longest edge of the raster artifact in pixels (100–10000).
    #[arg(long, env = "PDFTABLES_MAX_PIXELS", default_value_t = 1600,
          value_parser = clap::value_parser!(u32).range(100..=10_000))]
    max_pixels: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFTABLES_PASSWORD")]
    password: Option<String>,

    /// Suppress all output except errors and requested tables.
    #[arg(short, long, env = "PDFTABLES_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.debug {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.debug {
        eprintln!("{cli:#?}");
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Bind PDFium and wire the stages ──────────────────────────────────
    let pdfium = bind_pdfium().context("Failed to load the PDFium library")?;
    let reader = PdfiumReader::new(&pdfium).with_password(cli.password.as_deref());
    let renderer = PdfiumRenderer::new(&pdfium, config.max_rendered_pixels)
        .with_password(cli.password.as_deref());
    let annotator = GridAnnotator::default();
    let stages = Stages {
        reader: &reader,
        extractor: &GlyphGridExtractor,
        annotator: &annotator,
        renderer: &renderer,
        formatter: &AsciiTableFormatter,
    };

    // ── Run ──────────────────────────────────────────────────────────────
    let reporter = CliReporter { quiet: cli.quiet };
    let summaries = RenderSession::new(&config, stages)
        .reporter(&reporter)
        .inspect_hook(StdinInspectHook::new(io::stdin().lock(), io::stdout()))
        .render_all(&cli.pdfpath)
        .context("Rendering failed")?;

    if cli.debug {
        let json = serde_json::to_string_pretty(&summaries).context("Failed to serialise summary")?;
        eprintln!("{json}");
    }

    Ok(())
}

/// Map CLI args to `RenderConfig`.
fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let extraction = match cli.config {
        Some(ref json) => {
            ExtractionConfig::from_json(json).context("Invalid --config extraction parameters")?
        }
        None => ExtractionConfig::default(),
    };

    let mut builder = RenderConfig::builder()
        .max_rendered_pixels(cli.max_pixels)
        .show_ascii(cli.ascii)
        .pretty_print(cli.pprint)
        .interactive(cli.interactive)
        .extraction(extraction);

    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_root(dir);
    }

    builder.build().context("Invalid configuration")
}
