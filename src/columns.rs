//! Column inference from text geometry alone (spec.md §4.C).
//!
//! Titles and footer notes pollute column statistics, so the algorithm
//! trusts the middle of the line range for merging and only uses the
//! head/tail lines to seed columns that appear solely in a header.

use crate::geometry::Rectangle;
use crate::text::Line;

/// Start index and trusted-range length for a given line count, per the
/// tiered schedule of spec.md §4.C step 1.
fn trust_window(line_count: usize) -> (usize, usize) {
    let skip = if line_count <= 4 {
        0
    } else if line_count <= 7 {
        1
    } else {
        2
    };
    let start = skip;
    let end = line_count.saturating_sub(skip);
    (start, end)
}

/// Infers a sequence of ascending column right-edges from text lines
/// alone.
///
/// Returns an empty vector if `lines` has no non-whitespace chunks
/// anywhere (the stream extractor treats that as a single-column table).
pub fn infer_columns(lines: &[Line]) -> Vec<f64> {
    if lines.is_empty() {
        return Vec::new();
    }

    let (start, end) = trust_window(lines.len());
    let mut regions: Vec<Rectangle> = lines[start]
        .non_whitespace_chunks()
        .map(|c| c.bbox)
        .collect();

    // Probe mode: head lines before the trusted window.
    for line in &lines[..start] {
        probe_line(line, &mut regions);
    }

    // Merge mode: the trusted middle, excluding the seed line already
    // consumed above.
    for line in &lines[start + 1..end] {
        merge_line(line, &mut regions);
    }

    // Probe mode: tail lines after the trusted window.
    for line in &lines[end..] {
        probe_line(line, &mut regions);
    }

    finalize_regions(&mut regions);

    let mut edges: Vec<f64> = regions.iter().map(|r| r.right()).collect();
    edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    edges
}

/// Merge mode: every chunk merges into every region whose X-interval it
/// overlaps; unmatched chunks seed new regions.
fn merge_line(line: &Line, regions: &mut Vec<Rectangle>) {
    for chunk in line.non_whitespace_chunks() {
        let mut matched = false;
        for region in regions.iter_mut() {
            if region.horizontally_overlaps(&chunk.bbox) {
                *region = region.merge(&chunk.bbox);
                matched = true;
            }
        }
        if !matched {
            regions.push(chunk.bbox);
        }
    }
}

/// Probe mode: chunks never merge into existing regions; unmatched
/// chunks still seed new ones, capturing header-only columns.
fn probe_line(line: &Line, regions: &mut Vec<Rectangle>) {
    for chunk in line.non_whitespace_chunks() {
        let matched = regions.iter().any(|r| r.horizontally_overlaps(&chunk.bbox));
        if !matched {
            regions.push(chunk.bbox);
        }
    }
}

/// Iteratively merges any two regions whose X-intervals still overlap,
/// two passes through all pairs, then deduplicates exact repeats.
fn finalize_regions(regions: &mut Vec<Rectangle>) {
    for _pass in 0..2 {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..regions.len() {
                for j in (i + 1)..regions.len() {
                    if regions[i].horizontally_overlaps(&regions[j]) {
                        let combined = regions[i].merge(&regions[j]);
                        regions[i] = combined;
                        regions.remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }

    regions.sort_by(|a, b| a.left.partial_cmp(&b.left).unwrap_or(std::cmp::Ordering::Equal));
    regions.dedup_by(|a, b| (a.left - b.left).abs() < 1e-9 && (a.right() - b.right()).abs() < 1e-9);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{group_into_lines, merge_elements, ChunkAssemblyConfig, TextElement};

    fn line_with_chunks(top: f64, spans: &[(f64, f64)]) -> Line {
        let elements: Vec<TextElement> = spans
            .iter()
            .map(|(left, width)| TextElement::new("x", Rectangle::new(top, *left, *width, 10.0), 10.0, "Helvetica"))
            .collect();
        let chunks = merge_elements(&elements, &ChunkAssemblyConfig::default());
        group_into_lines(chunks, 0.5).into_iter().next().unwrap()
    }

    #[test]
    fn trust_window_uses_all_lines_when_four_or_fewer() {
        assert_eq!(trust_window(4), (0, 4));
        assert_eq!(trust_window(1), (0, 1));
    }

    #[test]
    fn trust_window_skips_one_for_five_to_seven_lines() {
        assert_eq!(trust_window(5), (1, 4));
        assert_eq!(trust_window(7), (1, 6));
    }

    #[test]
    fn trust_window_skips_two_above_seven_lines() {
        assert_eq!(trust_window(8), (2, 6));
        assert_eq!(trust_window(20), (2, 18));
    }

    #[test]
    fn columns_are_ascending_for_three_column_table() {
        let lines = vec![
            line_with_chunks(0.0, &[(50.0, 40.0), (200.0, 40.0), (380.0, 40.0)]),
            line_with_chunks(20.0, &[(50.0, 40.0), (200.0, 40.0), (380.0, 40.0)]),
            line_with_chunks(40.0, &[(50.0, 40.0), (200.0, 40.0), (380.0, 40.0)]),
            line_with_chunks(60.0, &[(50.0, 40.0), (200.0, 40.0), (380.0, 40.0)]),
        ];
        let columns = infer_columns(&lines);
        assert_eq!(columns.len(), 3);
        assert!(columns.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_lines_produce_no_columns() {
        assert!(infer_columns(&[]).is_empty());
    }

    #[test]
    fn header_only_column_is_captured_in_probe_mode() {
        // 8 lines: line 0 is a title spanning one wide column; lines 2..5
        // carry the real 2-column data; this exercises the skip=2 schedule.
        let mut lines = vec![line_with_chunks(0.0, &[(50.0, 300.0)])];
        for i in 1..8 {
            lines.push(line_with_chunks(i as f64 * 20.0, &[(50.0, 40.0), (200.0, 40.0)]));
        }
        let columns = infer_columns(&lines);
        assert!(columns.len() >= 2);
    }
}
