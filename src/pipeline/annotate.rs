//! Turn a page's tables into overlay shapes.

use crate::model::{Annotation, AnnotationKind, AnnotationShape, PageContent, Rect, TableContainer};
use crate::pipeline::Annotator;

/// Draws each table's outline and cell grid, plus a faint box around every
/// glyph inside a table so the operator can see what the extractor clustered.
#[derive(Debug, Clone, Copy)]
pub struct GridAnnotator {
    pub glyph_boxes: bool,
}

impl Default for GridAnnotator {
    fn default() -> Self {
        Self { glyph_boxes: true }
    }
}

impl Annotator for GridAnnotator {
    fn build_annotations(&self, page: &PageContent, tables: &TableContainer) -> Annotation {
        let mut shapes = Vec::new();

        for table in tables {
            let b = table.bounds;

            if self.glyph_boxes {
                shapes.extend(
                    page.glyphs
                        .iter()
                        .filter(|g| contains(&b, g.bounds.center_x(), g.bounds.center_y()))
                        .map(|g| AnnotationShape {
                            kind: AnnotationKind::Glyph,
                            rect: g.bounds,
                        }),
                );
            }

            shapes.extend(table.column_edges.iter().map(|&x| AnnotationShape {
                kind: AnnotationKind::ColumnEdge,
                rect: Rect::new(x, b.top, x, b.bottom),
            }));
            shapes.extend(table.row_edges.iter().map(|&y| AnnotationShape {
                kind: AnnotationKind::RowEdge,
                rect: Rect::new(b.left, y, b.right, y),
            }));
            shapes.push(AnnotationShape {
                kind: AnnotationKind::TableBounds,
                rect: b,
            });
        }

        Annotation {
            page_width: page.width,
            page_height: page.height,
            shapes,
        }
    }
}

fn contains(r: &Rect, x: f32, y: f32) -> bool {
    x >= r.left && x <= r.right && y >= r.top && y <= r.bottom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Glyph, Table};

    fn page() -> PageContent {
        PageContent {
            index: 0,
            width: 200.0,
            height: 100.0,
            glyphs: vec![
                Glyph {
                    text: 'a',
                    bounds: Rect::new(12.0, 12.0, 16.0, 20.0),
                },
                Glyph {
                    text: 'z',
                    bounds: Rect::new(150.0, 80.0, 154.0, 88.0),
                },
            ],
        }
    }

    fn tables() -> TableContainer {
        TableContainer {
            page_index: 0,
            tables: vec![Table {
                bounds: Rect::new(10.0, 10.0, 90.0, 50.0),
                column_edges: vec![40.0, 60.0],
                row_edges: vec![30.0],
                data: Vec::new(),
            }],
        }
    }

    fn count(annotation: &Annotation, kind: AnnotationKind) -> usize {
        annotation.shapes.iter().filter(|s| s.kind == kind).count()
    }

    #[test]
    fn grid_shapes_follow_table_geometry() {
        let annotation = GridAnnotator::default().build_annotations(&page(), &tables());
        assert_eq!(annotation.page_width, 200.0);
        assert_eq!(count(&annotation, AnnotationKind::TableBounds), 1);
        assert_eq!(count(&annotation, AnnotationKind::ColumnEdge), 2);
        assert_eq!(count(&annotation, AnnotationKind::RowEdge), 1);
        // Only the glyph inside the table is boxed.
        assert_eq!(count(&annotation, AnnotationKind::Glyph), 1);

        let column = annotation
            .shapes
            .iter()
            .find(|s| s.kind == AnnotationKind::ColumnEdge)
            .unwrap();
        assert_eq!(column.rect, Rect::new(40.0, 10.0, 40.0, 50.0));
    }

    #[test]
    fn glyph_boxes_can_be_disabled() {
        let annotation = GridAnnotator { glyph_boxes: false }.build_annotations(&page(), &tables());
        assert_eq!(count(&annotation, AnnotationKind::Glyph), 0);
    }

    #[test]
    fn no_tables_no_shapes() {
        let annotation =
            GridAnnotator::default().build_annotations(&page(), &TableContainer::default());
        assert!(annotation.shapes.is_empty());
        assert_eq!(annotation.page_height, 100.0);
    }
}
