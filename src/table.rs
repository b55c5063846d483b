//! The shared `Table`/`Cell` data model every extraction path assembles
//! into.

use crate::geometry::Rectangle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Something with a rectangle and text content that can be placed in a
/// [`Table`] cell. Both [`Cell`] (grid-derived) and
/// [`crate::text::TextChunk`] (inference-derived, before being folded
/// into a `Cell` at assembly time) satisfy it.
pub trait RectangularTextContainer {
    /// The container's bounding rectangle.
    fn bbox(&self) -> Rectangle;
    /// The container's text content.
    fn text(&self) -> &str;
}

/// A rectangular region plus the text placed inside it.
///
/// Cells are first derived from a grid intersection (or a column/row
/// inference pass), then populated by placing the chunks whose centroid
/// falls inside their rectangle.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    /// The cell's rectangle.
    pub bbox: Rectangle,
    /// Text content, concatenated in reading order.
    pub text: String,
    /// Number of column bands this cell spans (>1 for a merged cell).
    pub column_span: usize,
    /// Number of row bands this cell spans.
    pub row_span: usize,
}

impl Cell {
    /// Creates a new, empty 1x1 cell at the given rectangle.
    pub fn new(bbox: Rectangle) -> Self {
        Self {
            bbox,
            text: String::new(),
            column_span: 1,
            row_span: 1,
        }
    }

    /// Appends text to the cell, space-separating from any existing
    /// content — matches the teacher's `Cell::add_text` convention.
    pub fn add_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    /// True if the cell has no text content.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl RectangularTextContainer for Cell {
    fn bbox(&self) -> Rectangle {
        self.bbox
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// A row-major matrix of cells.
///
/// Invariant: every row has the same column count, and the table's
/// bounding rectangle encloses every placed cell.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table {
    /// Cells, row-major: `rows[row][col]`.
    pub rows: Vec<Vec<Cell>>,
    /// Bounding rectangle of the whole table.
    pub bbox: Rectangle,
}

impl Table {
    /// Builds a table from a row-major cell matrix and its bounding box.
    ///
    /// Every row must have the same length; callers that can't guarantee
    /// this (e.g. a fresh grid with no rows yet) should pad with empty
    /// cells rather than produce a ragged matrix, since the row
    /// rectangularity invariant is checked by construction here via a
    /// `debug_assert`.
    pub fn new(rows: Vec<Vec<Cell>>, bbox: Rectangle) -> Self {
        debug_assert!(
            rows.windows(2).all(|w| w[0].len() == w[1].len()),
            "table rows must all have the same column count"
        );
        Self { rows, bbox }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (0 if the table has no rows).
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Gets a cell by (row, col), if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(col)
    }

    /// An empty, single-cell table — the failure-mode result for a page
    /// with no text.
    pub fn empty(bbox: Rectangle) -> Self {
        Self {
            rows: vec![vec![Cell::new(bbox)]],
            bbox,
        }
    }

    /// True if every row has the same column count (always true for a
    /// table built through [`Table::new`], but re-checked here for
    /// tables assembled by direct field mutation in tests).
    pub fn is_rectangular(&self) -> bool {
        self.rows.windows(2).all(|w| w[0].len() == w[1].len())
    }

    /// Population ratio of non-empty cells, with a small size bonus,
    /// clamped to `1.0`. A table with a single empty cell (the
    /// empty-page failure mode) scores `0.0`.
    pub fn confidence(&self) -> f64 {
        let total = self.rows.iter().map(|r| r.len()).sum::<usize>();
        if total == 0 {
            return 0.0;
        }
        let populated = self.rows.iter().flatten().filter(|c| !c.is_empty()).count();
        let population_ratio = populated as f64 / total as f64;
        let size_bonus = ((total as f64).ln() / 20.0).min(0.1);
        (population_ratio + size_bonus).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_has_one_row_and_column() {
        let t = Table::empty(Rectangle::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.column_count(), 1);
    }

    #[test]
    fn table_is_rectangular_when_rows_match() {
        let row = vec![Cell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0)); 3];
        let t = Table::new(vec![row.clone(), row], Rectangle::new(0.0, 0.0, 30.0, 20.0));
        assert!(t.is_rectangular());
        assert_eq!(t.column_count(), 3);
    }

    #[test]
    fn cell_add_text_space_separates() {
        let mut cell = Cell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        cell.add_text("Hello");
        cell.add_text("World");
        assert_eq!(cell.text, "Hello World");
    }

    #[test]
    fn cell_is_empty_detects_whitespace_only() {
        let mut cell = Cell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        assert!(cell.is_empty());
        cell.add_text("  ");
        assert!(cell.is_empty());
    }

    #[test]
    fn confidence_is_zero_for_an_all_empty_table() {
        let row = vec![Cell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0)); 3];
        let t = Table::new(vec![row.clone(), row], Rectangle::new(0.0, 0.0, 30.0, 20.0));
        assert_eq!(t.confidence(), 0.0);
    }

    #[test]
    fn confidence_rises_with_populated_cells() {
        let mut a = Cell::new(Rectangle::new(0.0, 0.0, 10.0, 10.0));
        a.add_text("x");
        let mut b = Cell::new(Rectangle::new(0.0, 10.0, 10.0, 10.0));
        b.add_text("y");
        let t = Table::new(vec![vec![a, b]], Rectangle::new(0.0, 0.0, 20.0, 10.0));
        assert!(t.confidence() > 0.9);
    }
}
