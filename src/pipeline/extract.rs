//! Baseline table extractor: cluster glyph positions into rows and columns.
//!
//! The approach is deliberately simple so its behaviour is easy to see in
//! the rendered overlay:
//!
//! 1. glyphs sharing a baseline form a **line**;
//! 2. inside a line, a horizontal gap wider than the glyph height splits
//!    the line into **runs** (cell candidates);
//! 3. consecutive lines with at least `n_glyph_row_threshold` glyphs and two
//!    or more runs form a table **block**;
//! 4. run extents are projected onto the x-axis; every band holding at least
//!    `n_glyph_column_threshold` glyphs becomes a **column**.

use crate::config::ExtractionConfig;
use crate::error::RenderError;
use crate::model::{Glyph, PageContent, Rect, Table, TableContainer};
use crate::pipeline::TableExtractor;
use tracing::debug;

/// Gap (in glyph heights) rendered as a space inside a run.
const SPACE_GAP: f32 = 0.2;
/// Gap (in glyph heights) that separates two cells.
const CELL_GAP: f32 = 1.0;

/// [`TableExtractor`] working on glyph geometry only.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlyphGridExtractor;

impl TableExtractor for GlyphGridExtractor {
    fn extract_tables(
        &self,
        page: &PageContent,
        config: &ExtractionConfig,
    ) -> Result<TableContainer, RenderError> {
        let split_gap = if config.atomise() { SPACE_GAP } else { CELL_GAP };

        let lines: Vec<Line> = group_lines(&page.glyphs)
            .iter()
            .map(|glyphs| Line::from_glyphs(glyphs, split_gap))
            .collect();
        let lines = apply_hints(&lines, config);

        let row_threshold = config.glyph_row_threshold();
        let is_row = |line: &Line| line.glyph_count >= row_threshold && line.runs.len() >= 2;

        let mut tables = Vec::new();
        for block in lines.split(|line| !is_row(line)) {
            if block.len() < 2 {
                continue;
            }
            if let Some(table) = build_table(block, page, config) {
                tables.push(table);
            }
        }

        debug!(
            "Page {}: {} lines, {} tables",
            page.index + 1,
            lines.len(),
            tables.len()
        );

        Ok(TableContainer {
            page_index: page.index,
            tables,
        })
    }
}

#[derive(Debug, Clone)]
struct Run {
    text: String,
    bounds: Rect,
    glyph_count: usize,
}

#[derive(Debug, Clone)]
struct Line {
    bounds: Rect,
    glyph_count: usize,
    runs: Vec<Run>,
}

impl Line {
    /// `glyphs` must be sorted left to right.
    fn from_glyphs(glyphs: &[&Glyph], split_gap: f32) -> Self {
        let height = glyphs
            .iter()
            .map(|g| g.bounds.height())
            .fold(1.0_f32, f32::max);

        let mut runs: Vec<Run> = Vec::new();
        let mut prev: Option<&Glyph> = None;

        for &glyph in glyphs {
            let gap = prev.map(|p| glyph.bounds.left - p.bounds.right);
            match (gap, runs.last_mut()) {
                (Some(gap), Some(run)) if gap <= split_gap * height => {
                    if gap > SPACE_GAP * height {
                        run.text.push(' ');
                    }
                    run.text.push(glyph.text);
                    run.bounds = run.bounds.union(&glyph.bounds);
                    run.glyph_count += 1;
                }
                _ => runs.push(Run {
                    text: glyph.text.to_string(),
                    bounds: glyph.bounds,
                    glyph_count: 1,
                }),
            }
            prev = Some(glyph);
        }

        let bounds = runs
            .iter()
            .map(|r| r.bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();

        Line {
            bounds,
            glyph_count: glyphs.len(),
            runs,
        }
    }

    fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Group glyphs whose vertical centres lie within half a glyph height of the
/// line's first glyph. Lines come out top to bottom, glyphs left to right.
fn group_lines(glyphs: &[Glyph]) -> Vec<Vec<&Glyph>> {
    let mut sorted: Vec<&Glyph> = glyphs.iter().collect();
    sorted.sort_by(|a, b| a.bounds.center_y().total_cmp(&b.bounds.center_y()));

    let mut lines: Vec<Vec<&Glyph>> = Vec::new();
    for glyph in sorted {
        let same_line = lines.last().and_then(|l| l.first()).is_some_and(|first| {
            let tolerance = 0.5 * first.bounds.height().max(glyph.bounds.height()).max(1.0);
            (glyph.bounds.center_y() - first.bounds.center_y()).abs() <= tolerance
        });

        match lines.last_mut() {
            Some(line) if same_line => line.push(glyph),
            _ => lines.push(vec![glyph]),
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.bounds.left.total_cmp(&b.bounds.left));
    }
    lines
}

/// Restrict lines to the region between the top and bottom hints.
///
/// A hint that matches no line is ignored.
fn apply_hints<'a>(lines: &'a [Line], config: &ExtractionConfig) -> &'a [Line] {
    let find = |hint: &Option<String>, from: usize| {
        hint.as_deref().and_then(|h| {
            lines[from..]
                .iter()
                .position(|l| l.text().contains(h))
                .map(|i| i + from)
        })
    };

    let start = find(&config.table_top_hint, 0).unwrap_or(0);
    let end = find(&config.table_bottom_hint, start).map_or(lines.len(), |i| i + 1);
    &lines[start..end]
}

/// A vertical band of the block covered by at least one run.
#[derive(Debug, Clone, Copy)]
struct Band {
    left: f32,
    right: f32,
    glyph_count: usize,
}

fn column_bands(block: &[Line]) -> Vec<Band> {
    let mut runs: Vec<&Run> = block.iter().flat_map(|l| l.runs.iter()).collect();
    runs.sort_by(|a, b| a.bounds.left.total_cmp(&b.bounds.left));

    let mut bands: Vec<Band> = Vec::new();
    for run in runs {
        match bands.last_mut() {
            Some(band) if run.bounds.left <= band.right => {
                band.right = band.right.max(run.bounds.right);
                band.glyph_count += run.glyph_count;
            }
            _ => bands.push(Band {
                left: run.bounds.left,
                right: run.bounds.right,
                glyph_count: run.glyph_count,
            }),
        }
    }
    bands
}

fn build_table(block: &[Line], page: &PageContent, config: &ExtractionConfig) -> Option<Table> {
    let column_threshold = config.glyph_column_threshold();
    let columns: Vec<Band> = column_bands(block)
        .into_iter()
        .filter(|b| b.glyph_count >= column_threshold)
        .collect();

    if columns.len() < 2 {
        return None;
    }

    let column_edges: Vec<f32> = columns
        .windows(2)
        .map(|w| (w[0].right + w[1].left) / 2.0)
        .collect();

    let row_edges: Vec<f32> = block
        .windows(2)
        .map(|w| (w[0].bounds.bottom + w[1].bounds.top) / 2.0)
        .collect();

    let mut bounds = block
        .iter()
        .map(|l| l.bounds)
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default();
    if config.extend_y() {
        bounds.top = 0.0;
        bounds.bottom = page.height;
    }

    let data = block
        .iter()
        .map(|line| {
            let mut cells = vec![String::new(); columns.len()];
            for run in &line.runs {
                let col = column_edges
                    .iter()
                    .filter(|&&edge| run.bounds.center_x() > edge)
                    .count();
                let cell = &mut cells[col];
                if !cell.is_empty() {
                    cell.push(' ');
                }
                cell.push_str(&run.text);
            }
            cells
        })
        .collect();

    Some(Table {
        bounds,
        column_edges,
        row_edges,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: f32 = 10.0;

    /// Lay out `text` starting at (`x`, `y`) with fixed-width glyphs half as
    /// wide as they are tall. Spaces advance without producing a glyph.
    fn words(text: &str, x: f32, y: f32) -> Vec<Glyph> {
        let advance = SIZE / 2.0;
        text.chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| {
                let left = x + i as f32 * advance;
                Glyph {
                    text: c,
                    bounds: Rect::new(left, y, left + advance, y + SIZE),
                }
            })
            .collect()
    }

    fn row(cells: &[(&str, f32)], y: f32) -> Vec<Glyph> {
        cells.iter().flat_map(|(t, x)| words(t, *x, y)).collect()
    }

    fn price_list() -> PageContent {
        let mut glyphs = words("Quarterly report", 50.0, 40.0);
        glyphs.extend(row(&[("Name", 50.0), ("Qty", 200.0), ("Price", 300.0)], 100.0));
        glyphs.extend(row(&[("apple", 50.0), ("3", 200.0), ("1.20", 300.0)], 120.0));
        glyphs.extend(row(&[("green pear", 50.0), ("12", 200.0), ("0.80", 300.0)], 140.0));
        glyphs.extend(words("Prices include tax", 50.0, 200.0));
        PageContent {
            index: 2,
            width: 600.0,
            height: 800.0,
            glyphs,
        }
    }

    #[test]
    fn finds_three_column_table() {
        let tables = GlyphGridExtractor
            .extract_tables(&price_list(), &ExtractionConfig::default())
            .unwrap();

        assert_eq!(tables.page_index, 2);
        assert_eq!(tables.len(), 1);
        let table = &tables.tables[0];
        assert_eq!(
            table.data,
            vec![
                vec!["Name", "Qty", "Price"],
                vec!["apple", "3", "1.20"],
                vec!["green pear", "12", "0.80"],
            ]
        );
        assert_eq!(table.column_edges.len(), 2);
        assert_eq!(table.row_edges.len(), 2);
        assert!(table.bounds.top >= 100.0 && table.bounds.bottom <= 150.0);
    }

    #[test]
    fn glyph_order_does_not_matter() {
        let mut page = price_list();
        page.glyphs.reverse();
        let tables = GlyphGridExtractor
            .extract_tables(&page, &ExtractionConfig::default())
            .unwrap();
        assert_eq!(tables.tables[0].data[0], vec!["Name", "Qty", "Price"]);
    }

    #[test]
    fn row_threshold_excludes_sparse_lines() {
        let config = ExtractionConfig {
            n_glyph_row_threshold: Some(50),
            ..ExtractionConfig::default()
        };
        let tables = GlyphGridExtractor
            .extract_tables(&price_list(), &config)
            .unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn column_threshold_merges_thin_columns() {
        // The Qty column holds 3+1+2 = 6 glyphs; below the threshold it
        // disappears and its runs land in the column to the right.
        let config = ExtractionConfig {
            n_glyph_column_threshold: Some(7),
            ..ExtractionConfig::default()
        };
        let tables = GlyphGridExtractor
            .extract_tables(&price_list(), &config)
            .unwrap();
        let table = &tables.tables[0];
        assert_eq!(table.column_edges.len(), 1);
        assert_eq!(table.data[1], vec!["apple", "3 1.20"]);
    }

    #[test]
    fn atomise_splits_words_into_cells() {
        let config = ExtractionConfig {
            atomise: Some(true),
            n_glyph_column_threshold: Some(1),
            table_top_hint: Some("Name".into()),
            table_bottom_hint: Some("green".into()),
            ..ExtractionConfig::default()
        };
        let tables = GlyphGridExtractor
            .extract_tables(&price_list(), &config)
            .unwrap();
        let table = &tables.tables[0];
        assert_eq!(table.data[2][0], "green");
        assert_eq!(table.data[2][1], "pear");
    }

    #[test]
    fn hints_bound_the_table() {
        let config = ExtractionConfig {
            table_top_hint: Some("apple".into()),
            ..ExtractionConfig::default()
        };
        let tables = GlyphGridExtractor
            .extract_tables(&price_list(), &config)
            .unwrap();
        assert_eq!(tables.tables[0].row_count(), 2);
        assert_eq!(tables.tables[0].data[0][0], "apple");
    }

    #[test]
    fn extend_y_covers_the_page() {
        let config = ExtractionConfig {
            extend_y: Some(true),
            ..ExtractionConfig::default()
        };
        let tables = GlyphGridExtractor
            .extract_tables(&price_list(), &config)
            .unwrap();
        let bounds = tables.tables[0].bounds;
        assert_eq!(bounds.top, 0.0);
        assert_eq!(bounds.bottom, 800.0);
    }

    #[test]
    fn page_without_glyphs_has_no_tables() {
        let page = PageContent {
            index: 0,
            width: 600.0,
            height: 800.0,
            glyphs: Vec::new(),
        };
        let tables = GlyphGridExtractor
            .extract_tables(&page, &ExtractionConfig::default())
            .unwrap();
        assert!(tables.is_empty());
    }
}
