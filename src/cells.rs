//! Deriving minimal cell rectangles from a grid of horizontal and
//! vertical rulings (spec.md §4.E).

use crate::geometry::{Point, Rectangle, Ruling};

/// Default tolerance, in page units, for treating ruling coverage and
/// corner coordinates as equal. Callers that already snapped their
/// rulings with [`Ruling::snap_all`] can pass that same tolerance here.
const DEFAULT_TOLERANCE: f64 = 0.5;

/// Finds the minimal cell rectangles bounded by four actual ruling
/// segments in `horizontal`/`vertical`.
///
/// Both slices are expected to already be normalized and collapsed
/// (spec.md §4.E precondition: "already snapped and collapsed").
pub fn find_cells(horizontal: &[Ruling], vertical: &[Ruling]) -> Vec<Rectangle> {
    find_cells_with_tolerance(horizontal, vertical, DEFAULT_TOLERANCE)
}

/// As [`find_cells`], with an explicit corner/coverage tolerance.
pub fn find_cells_with_tolerance(horizontal: &[Ruling], vertical: &[Ruling], tolerance: f64) -> Vec<Rectangle> {
    let intersections = intersection_points(horizontal, vertical);
    if intersections.len() < 4 {
        return Vec::new();
    }

    let mut candidates: Vec<Rectangle> = Vec::new();
    for &top_left in &intersections {
        for &bottom_right in &intersections {
            if bottom_right.x <= top_left.x + tolerance || bottom_right.y <= top_left.y + tolerance {
                continue;
            }
            if is_bounded_cell(top_left, bottom_right, horizontal, vertical, tolerance) {
                candidates.push(Rectangle::from_edges(
                    top_left.y,
                    top_left.x,
                    bottom_right.x,
                    bottom_right.y,
                ));
            }
        }
    }

    dedup_rectangles(&mut candidates, tolerance);
    retain_minimal(candidates, tolerance)
}

fn intersection_points(horizontal: &[Ruling], vertical: &[Ruling]) -> Vec<Point> {
    let mut points = Vec::new();
    for h in horizontal {
        for v in vertical {
            if let Some(p) = h.intersects_line(v) {
                points.push(p);
            }
        }
    }
    points
}

fn is_bounded_cell(
    top_left: Point,
    bottom_right: Point,
    horizontal: &[Ruling],
    vertical: &[Ruling],
    tolerance: f64,
) -> bool {
    let has_top = horizontal
        .iter()
        .any(|r| (r.p1.y - top_left.y).abs() <= tolerance && r.covers_span(top_left.x, bottom_right.x, tolerance));
    let has_bottom = horizontal.iter().any(|r| {
        (r.p1.y - bottom_right.y).abs() <= tolerance && r.covers_span(top_left.x, bottom_right.x, tolerance)
    });
    let has_left = vertical
        .iter()
        .any(|r| (r.p1.x - top_left.x).abs() <= tolerance && r.covers_span(top_left.y, bottom_right.y, tolerance));
    let has_right = vertical.iter().any(|r| {
        (r.p1.x - bottom_right.x).abs() <= tolerance && r.covers_span(top_left.y, bottom_right.y, tolerance)
    });
    has_top && has_bottom && has_left && has_right
}

fn dedup_rectangles(rectangles: &mut Vec<Rectangle>, tolerance: f64) {
    rectangles.sort_by(|a, b| {
        a.left
            .partial_cmp(&b.left)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal))
    });
    rectangles.dedup_by(|a, b| {
        (a.left - b.left).abs() <= tolerance
            && (a.top - b.top).abs() <= tolerance
            && (a.right() - b.right()).abs() <= tolerance
            && (a.bottom() - b.bottom()).abs() <= tolerance
    });
}

/// Drops any cell that contains another cell's top-left corner in its
/// interior: a larger span would otherwise mask the underlying grid.
fn retain_minimal(rectangles: Vec<Rectangle>, tolerance: f64) -> Vec<Rectangle> {
    rectangles
        .iter()
        .filter(|candidate| {
            !rectangles.iter().any(|other| {
                if std::ptr::eq(*candidate, other) {
                    return false;
                }
                let corner = Point::new(other.left, other.top);
                strictly_contains(candidate, corner, tolerance)
            })
        })
        .cloned()
        .collect()
}

fn strictly_contains(rect: &Rectangle, point: Point, tolerance: f64) -> bool {
    point.x > rect.left + tolerance
        && point.x < rect.right() - tolerance
        && point.y > rect.top + tolerance
        && point.y < rect.bottom() - tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a 2x2 grid of cells from 3 horizontal + 3 vertical rulings.
    fn grid_rulings() -> (Vec<Ruling>, Vec<Ruling>) {
        let horizontal = vec![
            Ruling::from_coords(0.0, 0.0, 100.0, 0.0),
            Ruling::from_coords(0.0, 50.0, 100.0, 50.0),
            Ruling::from_coords(0.0, 100.0, 100.0, 100.0),
        ];
        let vertical = vec![
            Ruling::from_coords(0.0, 0.0, 0.0, 100.0),
            Ruling::from_coords(50.0, 0.0, 50.0, 100.0),
            Ruling::from_coords(100.0, 0.0, 100.0, 100.0),
        ];
        (horizontal, vertical)
    }

    #[test]
    fn finds_four_cells_in_a_two_by_two_grid() {
        let (h, v) = grid_rulings();
        let cells = find_cells(&h, &v);
        assert_eq!(cells.len(), 4);
        for cell in &cells {
            assert_eq!(cell.width, 50.0);
            assert_eq!(cell.height, 50.0);
        }
    }

    #[test]
    fn no_rulings_produce_no_cells() {
        assert!(find_cells(&[], &[]).is_empty());
    }

    #[test]
    fn minimality_drops_cells_that_mask_the_grid() {
        // A 2x2 grid plus one ruling set that would also bound the whole
        // 100x100 square: the square must not appear because it contains
        // the inner corner (50, 50).
        let (h, v) = grid_rulings();
        let cells = find_cells(&h, &v);
        assert!(!cells.iter().any(|c| c.width == 100.0 && c.height == 100.0));
    }

    #[test]
    fn twelve_cells_from_a_four_by_three_grid() {
        let horizontal: Vec<Ruling> = (0..5)
            .map(|i| Ruling::from_coords(0.0, i as f64 * 25.0, 120.0, i as f64 * 25.0))
            .collect();
        let vertical: Vec<Ruling> = (0..4)
            .map(|i| Ruling::from_coords(i as f64 * 40.0, 0.0, i as f64 * 40.0, 100.0))
            .collect();
        let cells = find_cells(&horizontal, &vertical);
        assert_eq!(cells.len(), 12);
    }
}
