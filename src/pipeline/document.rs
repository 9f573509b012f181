//! PDF access via pdfium: open documents and load page text.
//!
//! pdfium reports character boxes with the origin at the bottom-left of the
//! page. [`PageContent`] uses a top-left origin, so `y` is flipped here and
//! nowhere else.

use crate::error::RenderError;
use crate::model::{Glyph, PageContent, Rect};
use crate::pipeline::{Document, DocumentReader};
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a pdfium library file or the directory holding it.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library.
///
/// `PDFIUM_LIB_PATH` wins when set. Otherwise a library next to the working
/// directory is tried before the system-wide one.
pub fn bind_pdfium() -> Result<Pdfium, RenderError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            debug!("Binding pdfium from {}", path.display());
            if path.is_dir() {
                let lib = Pdfium::pdfium_platform_library_name_at_path(&path);
                Pdfium::bind_to_library(&lib)
            } else {
                Pdfium::bind_to_library(&path)
            }
        }
        None => {
            let local = Pdfium::pdfium_platform_library_name_at_path("./");
            Pdfium::bind_to_library(&local).or_else(|_| Pdfium::bind_to_system_library())
        }
    }
    .map_err(|e| RenderError::PdfiumBindingFailed(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}

/// Check that `path` names a readable file starting with the PDF magic bytes.
///
/// pdfium's own errors for a missing or non-PDF file are opaque; this gives
/// the operator a message that says what is actually wrong.
pub fn check_pdf_file(path: &Path) -> Result<(), RenderError> {
    let open_err = |detail: String| RenderError::DocumentOpen {
        path: path.to_path_buf(),
        detail,
    };

    if !path.exists() {
        return Err(open_err("file not found".into()));
    }
    if path.is_dir() {
        return Err(open_err("is a directory".into()));
    }

    let mut file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => open_err("permission denied".into()),
        _ => open_err(e.to_string()),
    })?;

    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(open_err(format!(
            "not a PDF file (first bytes: {magic:?})"
        )));
    }

    Ok(())
}

/// [`DocumentReader`] backed by pdfium.
pub struct PdfiumReader<'a> {
    pdfium: &'a Pdfium,
    password: Option<&'a str>,
}

impl<'a> PdfiumReader<'a> {
    pub fn new(pdfium: &'a Pdfium) -> Self {
        Self {
            pdfium,
            password: None,
        }
    }

    /// User password for encrypted documents.
    pub fn with_password(mut self, password: Option<&'a str>) -> Self {
        self.password = password;
        self
    }
}

impl DocumentReader for PdfiumReader<'_> {
    fn open(&self, path: &Path) -> Result<Box<dyn Document + '_>, RenderError> {
        check_pdf_file(path)?;

        let document = self
            .pdfium
            .load_pdf_from_file(path, self.password)
            .map_err(|e| {
                let detail = format!("{e:?}");
                let detail = if detail.contains("Password") || detail.contains("password") {
                    if self.password.is_some() {
                        "wrong password".to_string()
                    } else {
                        "document is encrypted; a password is required".to_string()
                    }
                } else {
                    detail
                };
                RenderError::DocumentOpen {
                    path: path.to_path_buf(),
                    detail,
                }
            })?;

        info!(
            "PDF loaded: {} ({} pages)",
            path.display(),
            document.pages().len()
        );
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl Document for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<PageContent, RenderError> {
        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| RenderError::PageLoad {
                page: index + 1,
                detail: format!("{e:?}"),
            })?;

        page_content(index, &page)
    }
}

#[allow(deprecated)]
fn page_content(index: usize, page: &PdfPage<'_>) -> Result<PageContent, RenderError> {
    let width = page.width().value;
    let height = page.height().value;

    let text = page.text().map_err(|e| RenderError::PageLoad {
        page: index + 1,
        detail: format!("{e:?}"),
    })?;

    let mut glyphs = Vec::new();
    for ch in text.chars().iter() {
        let Some(c) = ch.unicode_char() else {
            continue;
        };
        if c.is_whitespace() || c.is_control() {
            continue;
        }
        let Ok(b) = ch.loose_bounds() else {
            continue;
        };
        glyphs.push(Glyph {
            text: c,
            bounds: Rect::new(
                b.left.value,
                height - b.top.value,
                b.right.value,
                height - b.bottom.value,
            ),
        });
    }

    debug!(
        "Page {}: {:.0}x{:.0} pt, {} glyphs",
        index + 1,
        width,
        height,
        glyphs.len()
    );

    Ok(PageContent {
        index,
        width,
        height,
        glyphs,
    })
}
