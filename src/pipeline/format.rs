//! Plain-text rendering of table data.

use crate::model::TableData;
use crate::pipeline::TableFormatter;

/// Box-drawn ASCII grid, one line per row:
///
/// ```text
/// +-------+-----+
/// | Name  | Qty |
/// +-------+-----+
/// | apple | 3   |
/// +-------+-----+
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiTableFormatter;

impl TableFormatter for AsciiTableFormatter {
    fn format_table(&self, data: &TableData) -> String {
        let columns = data.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return String::from("(empty table)");
        }

        let mut widths = vec![0usize; columns];
        for row in data {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let rule = {
            let mut s = String::from("+");
            for w in &widths {
                s.push_str(&"-".repeat(w + 2));
                s.push('+');
            }
            s
        };

        let mut out = rule.clone();
        for row in data {
            out.push('\n');
            out.push('|');
            for (i, w) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let pad = w - cell.chars().count();
                out.push(' ');
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 1));
                out.push('|');
            }
            out.push('\n');
            out.push_str(&rule);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(rows: &[&[&str]]) -> TableData {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn renders_grid() {
        let text = AsciiTableFormatter.format_table(&data(&[&["Name", "Qty"], &["apple", "3"]]));
        let expected = "\
+-------+-----+
| Name  | Qty |
+-------+-----+
| apple | 3   |
+-------+-----+";
        assert_eq!(text, expected);
    }

    #[test]
    fn ragged_rows_are_padded() {
        let text = AsciiTableFormatter.format_table(&data(&[&["a", "b", "c"], &["d"]]));
        assert!(text.contains("| d |   |   |"), "got:\n{text}");
    }

    #[test]
    fn width_counts_characters_not_bytes() {
        let text = AsciiTableFormatter.format_table(&data(&[&["€"], &["ab"]]));
        assert!(text.starts_with("+----+"), "got:\n{text}");
        assert!(text.contains("| €  |"), "got:\n{text}");
    }

    #[test]
    fn empty_table() {
        assert_eq!(AsciiTableFormatter.format_table(&Vec::new()), "(empty table)");
    }
}
