//! Bullet-point text-edge reduction scenario (spec.md §8 S5).

mod common;

use common::FixturePage;
use tabula_core::edges::{find_text_edges, EdgeKind};
use tabula_core::page::Page;

/// S5: a column of five bullet characters at X=40 generates a tight
/// LEFT/MID/RIGHT triple that bullet-point reduction collapses to one
/// surviving edge.
#[test]
fn s5_bullet_column_collapses_to_one_edge() {
    let mut page = FixturePage::new(612.0, 792.0);
    for i in 0..6 {
        page = page.with_word(i as f64 * 20.0, 40.0, 6.0, 10.0, "*");
    }

    let chunks = tabula_core::text::merge_elements(&page.text, &Default::default());
    let lines = tabula_core::text::group_into_lines(chunks, 0.5);
    let bounds = page.text_bounds();
    let edges = find_text_edges(&lines, bounds, 4);

    // Without the 8-unit page-margin filter confusing things (bounds.left
    // set away from the bullet column), the tight left/mid/right triple
    // from a 6-unit-wide bullet glyph must reduce to a single edge.
    assert_eq!(edges.len(), 1);
    assert!(matches!(edges[0].kind, EdgeKind::Left | EdgeKind::Mid | EdgeKind::Right));
}
