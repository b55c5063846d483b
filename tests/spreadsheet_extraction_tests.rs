//! End-to-end spreadsheet extraction scenario (spec.md §8 S2).

mod common;

use common::FixturePage;
use tabula_core::cells;
use tabula_core::spreadsheet;
use tabula_core::text::{merge_elements, ChunkAssemblyConfig};

/// S2: a grid with 5 horizontal rulings and 4 vertical rulings forming
/// 4x3 cells. Expect 12 cells, row/col clustering recovers 4 rows and 3
/// columns; a chunk inside cell (row=1, col=1) lands there.
#[test]
fn s2_grid_with_rulings_recovers_four_rows_three_columns() {
    let mut page = FixturePage::new(400.0, 300.0);
    for i in 0..5 {
        page = page.with_horizontal_ruling(i as f64 * 50.0, 0.0, 330.0);
    }
    for i in 0..4 {
        page = page.with_vertical_ruling(i as f64 * 110.0, 0.0, 200.0);
    }
    page = page.with_word(55.0, 150.0, 30.0, 10.0, "inside");

    let horizontal = page.horizontal_rulings.clone();
    let vertical = page.vertical_rulings.clone();
    let grid = cells::find_cells(&horizontal, &vertical);
    assert_eq!(grid.len(), 12);

    let chunks = merge_elements(&page.text, &ChunkAssemblyConfig::default());
    let table = spreadsheet::build_table(&grid, &chunks);

    assert_eq!(table.row_count(), 4);
    assert_eq!(table.column_count(), 3);
    assert_eq!(table.get(1, 1).unwrap().text, "inside");
}
