//! Artifact rendering: rasterise a page via pdfium and draw the overlay.
//!
//! Two files per page:
//!
//! * **PNG** — the page raster with the overlay burned in.
//! * **SVG** — the clean page raster as an embedded base64 background, with
//!   the overlay as vector shapes on top. Coordinates are PDF points, so the
//!   shapes stay sharp at any zoom.
//!
//! ## Why cap pixels, not DPI?
//!
//! Page sizes vary wildly; `max_rendered_pixels` caps the longest edge
//! regardless of physical size, keeping memory bounded.

use crate::error::RenderError;
use crate::model::{Annotation, AnnotationShape};
use crate::output::ArtifactPaths;
use crate::pipeline::PageRenderer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect as PixelRect;
use pdfium_render::prelude::*;
use std::cell::RefCell;
use std::fmt::Write as _;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// [`PageRenderer`] backed by pdfium.
///
/// The most recently opened document is kept so consecutive pages of the
/// same file are rasterised without reloading it.
pub struct PdfiumRenderer<'a> {
    pdfium: &'a Pdfium,
    password: Option<&'a str>,
    max_pixels: u32,
    document: RefCell<Option<(PathBuf, PdfDocument<'a>)>>,
}

impl<'a> PdfiumRenderer<'a> {
    pub fn new(pdfium: &'a Pdfium, max_pixels: u32) -> Self {
        Self {
            pdfium,
            password: None,
            max_pixels,
            document: RefCell::new(None),
        }
    }

    pub fn with_password(mut self, password: Option<&'a str>) -> Self {
        self.password = password;
        self
    }

    fn rasterise(&self, pdf_path: &Path, page_index: usize) -> Result<DynamicImage, RenderError> {
        let render_err = |detail: String| RenderError::Render {
            path: pdf_path.to_path_buf(),
            detail: format!("page {}: {}", page_index + 1, detail),
        };

        let mut cached = self.document.borrow_mut();
        let stale = !matches!(&*cached, Some((path, _)) if path == pdf_path);
        if stale {
            let document = self
                .pdfium
                .load_pdf_from_file(pdf_path, self.password)
                .map_err(|e| render_err(format!("{e:?}")))?;
            debug!("Opened {} for rasterising", pdf_path.display());
            *cached = Some((pdf_path.to_path_buf(), document));
        }
        let (_, document) = cached
            .as_ref()
            .ok_or_else(|| render_err("document not loaded".into()))?;

        let page = document
            .pages()
            .get(page_index as u16)
            .map_err(|e| render_err(format!("{e:?}")))?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(self.max_pixels as i32)
            .set_maximum_height(self.max_pixels as i32);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| render_err(format!("{e:?}")))?;

        let image = bitmap.as_image();
        debug!(
            "Rasterised page {} → {}x{} px",
            page_index + 1,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

impl PageRenderer for PdfiumRenderer<'_> {
    fn render_page(
        &self,
        pdf_path: &Path,
        page_index: usize,
        annotation: &Annotation,
        artifacts: &ArtifactPaths,
    ) -> Result<(), RenderError> {
        let background = self.rasterise(pdf_path, page_index)?;
        write_artifacts(&background, annotation, artifacts)
    }
}

/// Write the PNG and SVG artifacts for an already rasterised page.
///
/// Either both files are written or neither is left behind.
pub fn write_artifacts(
    background: &DynamicImage,
    annotation: &Annotation,
    artifacts: &ArtifactPaths,
) -> Result<(), RenderError> {
    let png_err = |detail: String| RenderError::Render {
        path: artifacts.png.clone(),
        detail,
    };
    draw_overlay(background, annotation)
        .save_with_format(&artifacts.png, ImageFormat::Png)
        .map_err(|e| png_err(e.to_string()))?;

    if let Err(e) = write_svg(background, annotation, &artifacts.svg) {
        let _ = std::fs::remove_file(&artifacts.png);
        return Err(e);
    }
    Ok(())
}

fn write_svg(background: &DynamicImage, annotation: &Annotation, path: &Path) -> Result<(), RenderError> {
    let svg_err = |detail: String| RenderError::Render {
        path: path.to_path_buf(),
        detail,
    };
    let encoded = encode_png(background).map_err(|e| svg_err(e.to_string()))?;
    std::fs::write(path, svg_document(annotation, Some(&encoded))).map_err(|e| svg_err(e.to_string()))
}

/// Encode an image as base64 PNG.
pub fn encode_png(img: &DynamicImage) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded background → {} bytes base64", b64.len());
    Ok(b64)
}

/// Burn the overlay into a copy of `background`.
///
/// Shapes are in PDF points; they are scaled to the raster's pixel size.
pub fn draw_overlay(background: &DynamicImage, annotation: &Annotation) -> RgbaImage {
    let mut canvas = background.to_rgba8();
    if annotation.page_width <= 0.0 || annotation.page_height <= 0.0 {
        return canvas;
    }

    let sx = canvas.width() as f32 / annotation.page_width;
    let sy = canvas.height() as f32 / annotation.page_height;

    for shape in &annotation.shapes {
        let r = shape.rect;
        let stroke = (shape.kind.stroke_width() * sx).max(1.0);
        let color = Rgba(shape.kind.color());
        let (l, t, rt, b) = (r.left * sx, r.top * sy, r.right * sx, r.bottom * sy);

        for (x0, y0, x1, y1) in [(l, t, rt, t), (l, b, rt, b), (l, t, l, b), (rt, t, rt, b)] {
            draw_filled_rect_mut(&mut canvas, stroke_rect(x0, y0, x1, y1, stroke), color);
        }
    }
    canvas
}

/// Pixel rectangle covering the segment `(x0, y0)`–`(x1, y1)` widened by
/// `width`. Never empty; clipping to the canvas is left to imageproc.
fn stroke_rect(x0: f32, y0: f32, x1: f32, y1: f32, width: f32) -> PixelRect {
    let half = width / 2.0;
    let left = (x0 - half).floor();
    let top = (y0 - half).floor();
    let w = ((x1 + half).ceil() - left).max(1.0);
    let h = ((y1 + half).ceil() - top).max(1.0);
    PixelRect::at(left as i32, top as i32).of_size(w as u32, h as u32)
}

/// Build the SVG document for a page. `background` is a base64 PNG.
pub fn svg_document(annotation: &Annotation, background: Option<&str>) -> String {
    let (w, h) = (annotation.page_width, annotation.page_height);
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    if let Some(b64) = background {
        let _ = writeln!(
            svg,
            r#"  <image x="0" y="0" width="{w}" height="{h}" preserveAspectRatio="none" href="data:image/png;base64,{b64}"/>"#
        );
    }

    let _ = writeln!(svg, r#"  <g fill="none">"#);
    for shape in &annotation.shapes {
        svg.push_str("    ");
        svg.push_str(&svg_shape(shape));
        svg.push('\n');
    }
    svg.push_str("  </g>\n</svg>\n");
    svg
}

fn svg_shape(shape: &AnnotationShape) -> String {
    let [r, g, b, _] = shape.kind.color();
    let stroke = format!(
        r#"stroke="rgb({r},{g},{b})" stroke-width="{}""#,
        shape.kind.stroke_width()
    );
    let rect = shape.rect;

    if rect.width() == 0.0 || rect.height() == 0.0 {
        format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {stroke}/>"#,
            rect.left, rect.top, rect.right, rect.bottom
        )
    } else {
        format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" {stroke}/>"#,
            rect.left,
            rect.top,
            rect.width(),
            rect.height()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationKind, Rect};
    use tempfile::TempDir;

    fn white(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    fn annotation() -> Annotation {
        Annotation {
            page_width: 100.0,
            page_height: 50.0,
            shapes: vec![
                AnnotationShape {
                    kind: AnnotationKind::TableBounds,
                    rect: Rect::new(10.0, 10.0, 90.0, 40.0),
                },
                AnnotationShape {
                    kind: AnnotationKind::ColumnEdge,
                    rect: Rect::new(50.0, 10.0, 50.0, 40.0),
                },
            ],
        }
    }

    #[test]
    fn overlay_is_scaled_to_raster() {
        // 2 px per point.
        let canvas = draw_overlay(&white(200, 100), &annotation());
        let red = Rgba(AnnotationKind::TableBounds.color());
        let blue = Rgba(AnnotationKind::ColumnEdge.color());

        assert_eq!(*canvas.get_pixel(20, 20), red, "top-left corner of table");
        assert_eq!(*canvas.get_pixel(100, 50), blue, "column separator");
        assert_eq!(
            *canvas.get_pixel(60, 50),
            Rgba([255, 255, 255, 255]),
            "inside a cell stays clean"
        );
    }

    #[test]
    fn shapes_outside_the_raster_are_clipped() {
        let mut a = annotation();
        a.shapes.push(AnnotationShape {
            kind: AnnotationKind::TableBounds,
            rect: Rect::new(-20.0, -20.0, 500.0, 500.0),
        });
        let canvas = draw_overlay(&white(100, 50), &a);
        assert_eq!(canvas.dimensions(), (100, 50));
    }

    #[test]
    fn svg_has_background_and_shapes() {
        let svg = svg_document(&annotation(), Some("AAAA"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(svg.contains("data:image/png;base64,AAAA"));
        assert_eq!(svg.matches("<rect ").count(), 1);
        assert_eq!(svg.matches("<line ").count(), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn stroke_rect_is_widened_and_never_empty() {
        let r = stroke_rect(20.0, 20.0, 180.0, 20.0, 3.0);
        assert_eq!((r.left(), r.top(), r.width(), r.height()), (18, 18, 164, 4));

        let hair = stroke_rect(5.0, 5.0, 5.0, 5.0, 0.0);
        assert_eq!((hair.width(), hair.height()), (1, 1));
    }

    #[test]
    fn encoded_background_is_valid_base64() {
        let b64 = encode_png(&white(4, 4)).unwrap();
        let decoded = STANDARD.decode(&b64).expect("valid base64");
        assert_eq!(&decoded[1..4], b"PNG");
    }

    #[test]
    fn write_artifacts_creates_both_files() {
        let tmp = TempDir::new().unwrap();
        let artifacts = ArtifactPaths {
            svg: tmp.path().join("doc.pdf_00.svg"),
            png: tmp.path().join("doc.pdf_00.png"),
        };
        write_artifacts(&white(200, 100), &annotation(), &artifacts).unwrap();

        let png = image::open(&artifacts.png).unwrap();
        assert_eq!((png.width(), png.height()), (200, 100));
        let svg = std::fs::read_to_string(&artifacts.svg).unwrap();
        assert!(svg.contains("<rect "));
    }

    #[test]
    fn unwritable_target_is_a_render_error() {
        let tmp = TempDir::new().unwrap();
        let artifacts = ArtifactPaths {
            svg: tmp.path().join("missing/doc.svg"),
            png: tmp.path().join("missing/doc.png"),
        };
        match write_artifacts(&white(10, 10), &annotation(), &artifacts) {
            Err(RenderError::Render { path, .. }) => assert_eq!(path, artifacts.png),
            other => panic!("expected Render error, got {other:?}"),
        }
    }

    #[test]
    fn failed_svg_leaves_no_png_behind() {
        let tmp = TempDir::new().unwrap();
        let artifacts = ArtifactPaths {
            svg: tmp.path().join("missing/doc.pdf_00.svg"),
            png: tmp.path().join("doc.pdf_00.png"),
        };
        match write_artifacts(&white(10, 10), &annotation(), &artifacts) {
            Err(RenderError::Render { path, .. }) => assert_eq!(path, artifacts.svg),
            other => panic!("expected Render error, got {other:?}"),
        }
        assert!(!artifacts.png.exists());
    }
}
