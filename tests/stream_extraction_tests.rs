//! End-to-end stream extraction scenarios (spec.md §8 S1, S3).

mod common;

use common::FixturePage;
use tabula_core::config::StreamConfig;
use tabula_core::stream;

/// S1: pure text table, 4 rows x 3 columns, chunks at X={50,200,380}, no
/// rulings. `extract` must yield a 4x3 table with each cell populated by
/// the lone chunk on that row at that column.
#[test]
fn s1_pure_text_table_four_rows_three_columns() {
    let mut page = FixturePage::new(612.0, 792.0);
    for row in 0..4 {
        let top = row as f64 * 20.0;
        page = page
            .with_word(top, 50.0, 40.0, 10.0, &format!("r{row}c0"))
            .with_word(top, 200.0, 40.0, 10.0, &format!("r{row}c1"))
            .with_word(top, 380.0, 40.0, 10.0, &format!("r{row}c2"));
    }

    let table = stream::extract(&page, &StreamConfig::default());

    assert_eq!(table.row_count(), 4);
    assert_eq!(table.column_count(), 3);
    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            assert_eq!(cell.text, format!("r{row_idx}c{col_idx}"));
        }
    }
}

/// S3: header pollution. An 8-line text-only table where line 0 is a
/// single-span title; with the tiered skip schedule (skip 2 at top and
/// tail for >7 lines) the title must not contaminate column inference.
#[test]
fn s3_title_line_does_not_pollute_columns() {
    let mut page = FixturePage::new(612.0, 792.0).with_word(0.0, 50.0, 400.0, 10.0, "A Report Title Spanning Everything");
    for row in 1..8 {
        let top = row as f64 * 20.0;
        page = page
            .with_word(top, 50.0, 40.0, 10.0, "left")
            .with_word(top, 300.0, 40.0, 10.0, "right");
    }

    let table = stream::extract(&page, &StreamConfig::default());

    // The title row still gets a row in the output (stream binning
    // doesn't drop lines), but column count reflects the 2-column body.
    assert_eq!(table.row_count(), 8);
    assert_eq!(table.column_count(), 2);
}

/// Row rectangularity (spec.md §8 property 1): every row has the same
/// column count.
#[test]
fn every_row_has_equal_column_count() {
    let mut page = FixturePage::new(612.0, 792.0);
    for row in 0..5 {
        let top = row as f64 * 20.0;
        page = page.with_word(top, 50.0, 30.0, 10.0, "x");
        if row % 2 == 0 {
            page = page.with_word(top, 300.0, 30.0, 10.0, "y");
        }
    }
    let table = stream::extract(&page, &StreamConfig::default());
    assert!(table.is_rectangular());
}

/// Containment (spec.md §8 property 2): every placed chunk's center lies
/// within the table's bounding rectangle.
#[test]
fn placed_chunk_centers_lie_within_table_bounds() {
    let page = FixturePage::new(612.0, 792.0)
        .with_word(0.0, 50.0, 30.0, 10.0, "a")
        .with_word(20.0, 200.0, 30.0, 10.0, "b")
        .with_word(40.0, 380.0, 30.0, 10.0, "c");

    let table = stream::extract(&page, &StreamConfig::default());
    for row in &table.rows {
        for cell in row {
            if cell.is_empty() {
                continue;
            }
            let cx = cell.bbox.left + cell.bbox.width / 2.0;
            let cy = cell.bbox.top + cell.bbox.height / 2.0;
            assert!(table.bbox.contains_point(tabula_core::geometry::Point::new(cx, cy)));
        }
    }
}
