//! Values passed between the pipeline stages.
//!
//! Coordinates are PDF points with the origin at the **top-left** of the page
//! and `y` growing downwards, matching both SVG and raster pixel space. The
//! document reader flips pdfium's bottom-left origin on the way in.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A single positioned character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    pub text: char,
    pub bounds: Rect,
}

/// Everything the extractor needs to know about one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Zero-based page index within the document.
    pub index: usize,
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Glyphs in content-stream order.
    pub glyphs: Vec<Glyph>,
}

/// Cell text indexed by `[row][column]`.
pub type TableData = Vec<Vec<String>>;

/// A table found on a page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Outer bounding box.
    pub bounds: Rect,
    /// Vertical separators between columns (x positions, ascending).
    pub column_edges: Vec<f32>,
    /// Horizontal separators between rows (y positions, ascending).
    pub row_edges: Vec<f32>,
    pub data: TableData,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn column_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// The tables one extraction pass found on a page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableContainer {
    pub page_index: usize,
    pub tables: Vec<Table>,
}

impl TableContainer {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Table> {
        self.tables.iter()
    }
}

impl<'a> IntoIterator for &'a TableContainer {
    type Item = &'a Table;
    type IntoIter = std::slice::Iter<'a, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

/// What an overlay shape marks on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Outline of a whole table.
    TableBounds,
    /// A column separator.
    ColumnEdge,
    /// A row separator.
    RowEdge,
    /// Box around a glyph the extractor looked at.
    Glyph,
}

impl AnnotationKind {
    /// Stroke colour as RGBA.
    pub fn color(&self) -> [u8; 4] {
        match self {
            AnnotationKind::TableBounds => [220, 20, 60, 255],
            AnnotationKind::ColumnEdge => [30, 144, 255, 255],
            AnnotationKind::RowEdge => [34, 139, 34, 255],
            AnnotationKind::Glyph => [160, 160, 160, 255],
        }
    }

    /// Stroke width in points.
    pub fn stroke_width(&self) -> f32 {
        match self {
            AnnotationKind::TableBounds => 1.5,
            AnnotationKind::ColumnEdge | AnnotationKind::RowEdge => 0.75,
            AnnotationKind::Glyph => 0.25,
        }
    }
}

/// One rectangle to draw over the page. Separators are degenerate rectangles
/// of zero width or height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationShape {
    pub kind: AnnotationKind,
    pub rect: Rect,
}

/// A rendering-ready overlay for one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Annotation {
    pub page_width: f32,
    pub page_height: f32,
    pub shapes: Vec<AnnotationShape>,
}
