//! Stream extraction: bin text chunks into a row x column matrix using
//! inferred (or caller-supplied) column right-edges (spec.md §4.D).

use crate::columns::infer_columns;
use crate::config::StreamConfig;
use crate::geometry::{Rectangle, Ruling};
use crate::page::Page;
use crate::spreadsheet;
use crate::table::{Cell, Table};
use crate::text::{group_into_lines, merge_elements_with_barriers, ChunkAssemblyConfig, Line, TextChunk};

/// Fraction of meaningful horizontal rulings per text line above which
/// mixed mode synthesizes a full ruling grid and delegates to the
/// spreadsheet extractor (spec.md §4.D step 4).
const MIXED_MODE_COLUMN_OFFSET: f64 = 1.0;

/// Extracts a single [`Table`] from `page` using the stream strategy.
///
/// If `config.vertical_ruling_xs` is set, those X positions are used as
/// columns directly; otherwise columns are inferred from text geometry
/// alone (spec.md §4.C). If `config.mixed_table_extraction_enabled` is set
/// and the page's horizontal-ruling density clears the configured ratio,
/// this delegates to the spreadsheet extractor on a synthesized ruling
/// grid instead (spec.md §4.D step 4).
pub fn extract(page: &dyn Page, config: &StreamConfig) -> Table {
    let barriers: Vec<f64> = config.vertical_ruling_xs.clone().unwrap_or_default();
    let chunks = merge_elements_with_barriers(&page.text(), &ChunkAssemblyConfig::default(), &barriers);
    let lines = group_into_lines(chunks, config.line_overlap_threshold);

    if lines.is_empty() {
        return Table::empty(page.bounds());
    }

    if config.mixed_table_extraction_enabled {
        if let Some(table) = try_mixed_mode(page, &lines, config) {
            return table;
        }
    }

    let columns = match &config.vertical_ruling_xs {
        Some(xs) => {
            let mut sorted = xs.clone();
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            sorted
        }
        None => infer_columns(&lines),
    };

    build_grid(&lines, &columns)
}

/// Bins each line's chunks into cells by column right-edge: for each
/// non-whitespace chunk, find the smallest column index `j` with
/// `chunk.left <= columns[j]`, else the overflow column (spec.md §4.D
/// step 3). The overflow column is only materialized when some chunk
/// actually lands past the last edge; the rightmost inferred edge
/// always covers its own chunk, so without this check every table
/// would carry one spurious, structurally-empty trailing column.
fn build_grid(lines: &[Line], columns: &[f64]) -> Table {
    let last_edge = columns.last().copied().unwrap_or(f64::NEG_INFINITY);
    let needs_overflow_column = lines
        .iter()
        .flat_map(|line| line.non_whitespace_chunks())
        .any(|chunk| chunk.left() > last_edge);
    let col_count = columns.len() + usize::from(needs_overflow_column);
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(lines.len());
    let mut bbox: Option<Rectangle> = None;

    for line in lines {
        let row_rect = line.bbox();
        bbox = Some(bbox.map_or(row_rect, |b| b.merge(&row_rect)));

        let mut row: Vec<Cell> = (0..col_count)
            .map(|col| {
                let left = if col == 0 { row_rect.left } else { columns[col - 1] };
                let right = if col < columns.len() { columns[col] } else { row_rect.right() };
                Cell::new(Rectangle::from_edges(row_rect.top, left, right.max(left), row_rect.bottom()))
            })
            .collect();

        for chunk in line.non_whitespace_chunks() {
            let col = columns.iter().position(|&edge| chunk.left() <= edge).unwrap_or(columns.len());
            row[col].add_text(&chunk.text);
            row[col].bbox = row[col].bbox.merge(&chunk.bbox);
        }

        rows.push(row);
    }

    Table::new(rows, bbox.unwrap_or_else(|| Rectangle::new(0.0, 0.0, 0.0, 0.0)))
}

/// Mixed mode (spec.md §4.D step 4): if the density of meaningful
/// horizontal rulings (surviving page-edge clipping, discounting ones
/// entirely above/below all text) exceeds the configured ratio relative
/// to the number of text lines, synthesize a ruling grid and delegate to
/// the spreadsheet extractor. Returns `None` if the ratio isn't cleared.
fn try_mixed_mode(page: &dyn Page, lines: &[Line], config: &StreamConfig) -> Option<Table> {
    let text_bounds = page.text_bounds();
    let meaningful: Vec<Ruling> = page
        .horizontal_rulings()
        .into_iter()
        .filter(|r| r.bounds().bottom() >= text_bounds.top && r.bounds().top <= text_bounds.bottom())
        .collect();

    if lines.is_empty() || meaningful.len() as f64 / lines.len() as f64 <= config.mixed_mode_ratio_threshold {
        return None;
    }

    let mut horizontal = Ruling::collapse_oriented_rulings(&meaningful, 0.0);

    let topmost_ruling = horizontal.iter().map(|r| r.p1.y).fold(f64::INFINITY, f64::min);
    if text_bounds.top < topmost_ruling {
        horizontal.push(Ruling::from_coords(text_bounds.left, text_bounds.top, text_bounds.right(), text_bounds.top));
    }
    let bottommost_ruling = horizontal.iter().map(|r| r.p1.y).fold(f64::NEG_INFINITY, f64::max);
    if text_bounds.bottom() > bottommost_ruling {
        horizontal.push(Ruling::from_coords(
            text_bounds.left,
            text_bounds.bottom(),
            text_bounds.right(),
            text_bounds.bottom(),
        ));
    }

    let columns = match &config.vertical_ruling_xs {
        Some(xs) => xs.clone(),
        None => infer_columns(lines),
    };
    let vertical: Vec<Ruling> = columns
        .iter()
        .map(|&x| {
            let offset = x + MIXED_MODE_COLUMN_OFFSET;
            Ruling::from_coords(offset, text_bounds.top, offset, text_bounds.bottom())
        })
        .collect();

    let cells = crate::cells::find_cells(&horizontal, &vertical);
    if cells.is_empty() {
        return None;
    }

    let chunks: Vec<TextChunk> = lines.iter().flat_map(|l| l.chunks.clone()).collect();
    Some(spreadsheet::build_table(&cells, &chunks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextElement;

    struct FakePage {
        text: Vec<TextElement>,
        horizontal_rulings: Vec<Ruling>,
        width: f64,
        height: f64,
    }

    impl Page for FakePage {
        fn text(&self) -> Vec<TextElement> {
            self.text.clone()
        }
        fn horizontal_rulings(&self) -> Vec<Ruling> {
            self.horizontal_rulings.clone()
        }
        fn vertical_rulings(&self) -> Vec<Ruling> {
            Vec::new()
        }
        fn width(&self) -> f64 {
            self.width
        }
        fn height(&self) -> f64 {
            self.height
        }
        fn area(&self, rect: Rectangle) -> Box<dyn Page> {
            let text = self.text.iter().filter(|e| rect.contains(&e.bbox)).cloned().collect();
            Box::new(FakePage {
                text,
                horizontal_rulings: Vec::new(),
                width: rect.width,
                height: rect.height,
            })
        }
    }

    fn grid_page(rows: usize, cols: &[f64]) -> FakePage {
        let mut text = Vec::new();
        for r in 0..rows {
            for &left in cols {
                text.push(TextElement::new(
                    format!("r{r}c{left}"),
                    Rectangle::new(r as f64 * 20.0, left, 30.0, 10.0),
                    10.0,
                    "Helvetica",
                ));
            }
        }
        FakePage { text, horizontal_rulings: Vec::new(), width: 600.0, height: 800.0 }
    }

    #[test]
    fn extracts_a_four_by_three_table_from_pure_text() {
        let page = grid_page(4, &[50.0, 200.0, 380.0]);
        let table = extract(&page, &StreamConfig::default());
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_count(), 3);
        for row in &table.rows {
            for cell in row {
                assert!(!cell.is_empty());
            }
        }
    }

    #[test]
    fn empty_page_yields_single_empty_table() {
        let page = FakePage { text: Vec::new(), horizontal_rulings: Vec::new(), width: 600.0, height: 800.0 };
        let table = extract(&page, &StreamConfig::default());
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn explicit_vertical_ruling_xs_override_inference() {
        let page = grid_page(3, &[50.0, 200.0]);
        let config = StreamConfig::new().with_vertical_ruling_xs(vec![100.0, 300.0]);
        let table = extract(&page, &config);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn chunks_beyond_last_column_land_in_overflow_cell() {
        let page = grid_page(2, &[50.0]);
        let config = StreamConfig::new().with_vertical_ruling_xs(vec![30.0]);
        let table = extract(&page, &config);
        // the only chunk starts at x=50, past the single column edge at 30.
        assert!(!table.get(0, 1).unwrap().is_empty());
    }

    #[test]
    fn mixed_mode_is_a_no_op_below_the_ratio_threshold() {
        let mut page = grid_page(6, &[50.0, 200.0]);
        page.horizontal_rulings = vec![Ruling::from_coords(0.0, 5.0, 400.0, 5.0)];
        let config = StreamConfig::new().with_mixed_table_extraction(true);
        let table = extract(&page, &config);
        assert_eq!(table.row_count(), 6);
    }

    #[test]
    fn mixed_mode_delegates_to_spreadsheet_above_the_ratio_threshold() {
        let mut page = grid_page(5, &[50.0, 200.0]);
        page.horizontal_rulings = vec![
            Ruling::from_coords(0.0, 30.0, 400.0, 30.0),
            Ruling::from_coords(0.0, 50.0, 400.0, 50.0),
        ];
        let config = StreamConfig::new().with_mixed_table_extraction(true);
        let table = extract(&page, &config);
        assert!(table.row_count() >= 1);
        assert!(table.column_count() >= 1);
    }
}
