//! Reconstructing a `Table` from a cell grid and the text chunks that
//! land inside it (spec.md §4.F).

use crate::geometry::Rectangle;
use crate::table::{Cell, Table};
use crate::text::TextChunk;

/// Default X/Y tolerance, in page units, used when clustering cell edges
/// into row/column bands.
const DEFAULT_TOLERANCE: f64 = 1.0;

/// Builds a [`Table`] from a set of minimal cell rectangles (as produced
/// by [`crate::cells::find_cells`]) and the text chunks that fall inside
/// the same area.
pub fn build_table(cells: &[Rectangle], chunks: &[TextChunk]) -> Table {
    build_table_with_tolerance(cells, chunks, DEFAULT_TOLERANCE)
}

/// As [`build_table`], with an explicit edge-clustering tolerance.
pub fn build_table_with_tolerance(cells: &[Rectangle], chunks: &[TextChunk], tolerance: f64) -> Table {
    if cells.is_empty() {
        return Table::new(Vec::new(), Rectangle::new(0.0, 0.0, 0.0, 0.0));
    }

    let row_bounds = cluster_boundaries(
        &cells.iter().flat_map(|c| [c.top, c.bottom()]).collect::<Vec<_>>(),
        tolerance,
    );
    let col_bounds = cluster_boundaries(
        &cells.iter().flat_map(|c| [c.left, c.right()]).collect::<Vec<_>>(),
        tolerance,
    );

    let row_count = row_bounds.len().saturating_sub(1).max(1);
    let col_count = col_bounds.len().saturating_sub(1).max(1);

    let mut rows: Vec<Vec<Cell>> = (0..row_count)
        .map(|row| {
            (0..col_count)
                .map(|col| {
                    Cell::new(Rectangle::from_edges(
                        row_bounds[row],
                        col_bounds[col],
                        col_bounds[col + 1],
                        row_bounds[row + 1],
                    ))
                })
                .collect()
        })
        .collect();

    for cell in cells {
        let row_start = nearest_boundary_index(&row_bounds, cell.top);
        let row_end = nearest_boundary_index(&row_bounds, cell.bottom()).max(row_start + 1);
        let col_start = nearest_boundary_index(&col_bounds, cell.left);
        let col_end = nearest_boundary_index(&col_bounds, cell.right()).max(col_start + 1);

        if row_start >= row_count || col_start >= col_count {
            continue;
        }
        let row_span = (row_end - row_start).min(row_count - row_start).max(1);
        let col_span = (col_end - col_start).min(col_count - col_start).max(1);

        rows[row_start][col_start] = Cell {
            bbox: *cell,
            text: String::new(),
            column_span: col_span,
            row_span,
        };

        for r in row_start..row_start + row_span {
            for c in col_start..col_start + col_span {
                if (r, c) != (row_start, col_start) {
                    rows[r][c].column_span = 0;
                    rows[r][c].row_span = 0;
                }
            }
        }
    }

    place_text(&mut rows, chunks);

    let bbox = cells.iter().skip(1).fold(cells[0], |acc, c| acc.merge(c));
    Table::new(rows, bbox)
}

/// Places each chunk in the cell whose rectangle contains its geometric
/// center, concatenating text in natural reading order.
fn place_text(rows: &mut [Vec<Cell>], chunks: &[TextChunk]) {
    let mut ordered: Vec<&TextChunk> = chunks.iter().filter(|c| !c.is_whitespace()).collect();
    ordered.sort_by(|a, b| {
        a.bbox
            .top
            .partial_cmp(&b.bbox.top)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.bbox.left.partial_cmp(&b.bbox.left).unwrap_or(std::cmp::Ordering::Equal))
    });

    for chunk in ordered {
        let center = (chunk.bbox.left + chunk.bbox.width / 2.0, chunk.bbox.top + chunk.bbox.height / 2.0);
        for row in rows.iter_mut() {
            for cell in row.iter_mut() {
                if cell.row_span == 0 || cell.column_span == 0 {
                    continue;
                }
                if cell.bbox.contains_point(crate::geometry::Point::new(center.0, center.1)) {
                    cell.add_text(&chunk.text);
                }
            }
        }
    }
}

fn cluster_boundaries(values: &[f64], tolerance: f64) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut clustered: Vec<f64> = Vec::new();
    for v in sorted {
        match clustered.last() {
            Some(&last) if (v - last).abs() <= tolerance => {}
            _ => clustered.push(v),
        }
    }
    clustered
}

fn nearest_boundary_index(boundaries: &[f64], value: f64) -> usize {
    boundaries
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (value - **a)
                .abs()
                .partial_cmp(&(value - **b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextChunk;

    fn chunk(text: &str, top: f64, left: f64) -> TextChunk {
        TextChunk {
            text: text.to_string(),
            bbox: Rectangle::new(top, left, 20.0, 10.0),
            font_size: 10.0,
            font_name: "Helvetica".to_string(),
        }
    }

    fn two_by_two_cells() -> Vec<Rectangle> {
        vec![
            Rectangle::from_edges(0.0, 0.0, 50.0, 50.0),
            Rectangle::from_edges(0.0, 50.0, 100.0, 50.0),
            Rectangle::from_edges(50.0, 0.0, 50.0, 100.0),
            Rectangle::from_edges(50.0, 50.0, 100.0, 100.0),
        ]
    }

    #[test]
    fn builds_a_two_by_two_grid() {
        let table = build_table(&two_by_two_cells(), &[]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn places_text_by_centroid() {
        let chunks = vec![chunk("top-left", 10.0, 10.0), chunk("bottom-right", 60.0, 60.0)];
        let table = build_table(&two_by_two_cells(), &chunks);
        assert_eq!(table.get(0, 0).unwrap().text, "top-left");
        assert_eq!(table.get(1, 1).unwrap().text, "bottom-right");
        assert!(table.get(0, 1).unwrap().is_empty());
    }

    #[test]
    fn empty_cells_produce_an_empty_table() {
        let table = build_table(&[], &[]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn merged_cell_spans_two_columns() {
        let cells = vec![
            Rectangle::from_edges(0.0, 0.0, 100.0, 50.0),
            Rectangle::from_edges(50.0, 0.0, 50.0, 100.0),
            Rectangle::from_edges(50.0, 50.0, 100.0, 100.0),
        ];
        let table = build_table(&cells, &[]);
        assert_eq!(table.get(0, 0).unwrap().column_span, 2);
        assert_eq!(table.get(0, 1).unwrap().column_span, 0);
    }

    #[test]
    fn reading_order_concatenates_multiple_chunks_in_one_cell() {
        let chunks = vec![chunk("World", 20.0, 10.0), chunk("Hello", 10.0, 10.0)];
        let table = build_table(&two_by_two_cells(), &chunks);
        assert_eq!(table.get(0, 0).unwrap().text, "Hello World");
    }
}
