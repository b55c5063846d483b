//! Horizontal/vertical line segments ("rulings") and the operations used
//! to clean them up before they feed the cell finder or the table-area
//! detector.

use super::{Point, Rectangle};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Orientation of a normalized ruling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// y1 == y2.
    Horizontal,
    /// x1 == x2.
    Vertical,
}

/// A line segment constrained, after [`Ruling::normalize`], to be either
/// horizontal or vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ruling {
    /// Start point.
    pub p1: Point,
    /// End point.
    pub p2: Point,
}

impl Ruling {
    /// Creates a new (not yet normalized) ruling.
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Convenience constructor from raw coordinates.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    fn dx(&self) -> f64 {
        self.p2.x - self.p1.x
    }

    fn dy(&self) -> f64 {
        self.p2.y - self.p1.y
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    /// Whether the underlying coordinates are all finite.
    pub fn is_finite(&self) -> bool {
        self.p1.x.is_finite() && self.p1.y.is_finite() && self.p2.x.is_finite() && self.p2.y.is_finite()
    }

    /// Classifies the ruling's orientation. Returns `None` for a diagonal
    /// segment (neither axis is constant) or a degenerate zero-length one.
    ///
    /// A small tolerance handles floating point noise from upstream
    /// geometry; anything beyond it is treated as genuinely oblique and
    /// discarded by callers ([`Ruling::normalize`]).
    pub fn orientation(&self, tolerance: f64) -> Option<Orientation> {
        if self.length() == 0.0 {
            return None;
        }
        let dx = self.dx().abs();
        let dy = self.dy().abs();
        if dy <= tolerance {
            Some(Orientation::Horizontal)
        } else if dx <= tolerance {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }

    /// Forces the ruling to be exactly horizontal or vertical by snapping
    /// the off-axis coordinate to match, within `tolerance`. Returns
    /// `None` if the ruling is oblique (both axes vary beyond tolerance)
    /// or degenerate (zero length, non-finite coordinates) — such rulings
    /// are dropped silently per the malformed-ruling error policy.
    pub fn normalize(&self, tolerance: f64) -> Option<Ruling> {
        if !self.is_finite() {
            return None;
        }
        match self.orientation(tolerance)? {
            Orientation::Horizontal => {
                let y = (self.p1.y + self.p2.y) / 2.0;
                let (x1, x2) = (self.p1.x.min(self.p2.x), self.p1.x.max(self.p2.x));
                if (x2 - x1) <= 0.0 {
                    return None;
                }
                Some(Ruling::from_coords(x1, y, x2, y))
            }
            Orientation::Vertical => {
                let x = (self.p1.x + self.p2.x) / 2.0;
                let (y1, y2) = (self.p1.y.min(self.p2.y), self.p1.y.max(self.p2.y));
                if (y2 - y1) <= 0.0 {
                    return None;
                }
                Some(Ruling::from_coords(x, y1, x, y2))
            }
        }
    }

    /// Orientation of an already-normalized ruling. Panics in debug builds
    /// only via the `is_normalized` invariant check is deliberately not
    /// done here — callers that skip `normalize` get `Horizontal` for any
    /// segment with `dy == 0`, matching a straight read of the field
    /// values.
    pub fn normalized_orientation(&self) -> Orientation {
        if self.p1.y == self.p2.y {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Bounding rectangle of the segment.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_edges(
            self.p1.y.min(self.p2.y),
            self.p1.x.min(self.p2.x),
            self.p1.x.max(self.p2.x),
            self.p1.y.max(self.p2.y),
        )
    }

    /// True if this ruling (assumed normalized) covers the given span on
    /// its own axis: for a horizontal ruling, an X span; for a vertical
    /// one, a Y span.
    pub fn covers_span(&self, lo: f64, hi: f64, tolerance: f64) -> bool {
        match self.normalized_orientation() {
            Orientation::Horizontal => {
                self.p1.x - tolerance <= lo && self.p2.x + tolerance >= hi
            }
            Orientation::Vertical => {
                self.p1.y - tolerance <= lo && self.p2.y + tolerance >= hi
            }
        }
    }

    /// Whether this (normalized) ruling crosses `other` (normalized,
    /// opposite orientation) and, if so, the intersection point.
    pub fn intersects_line(&self, other: &Ruling) -> Option<Point> {
        let (h, v) = match (self.normalized_orientation(), other.normalized_orientation()) {
            (Orientation::Horizontal, Orientation::Vertical) => (self, other),
            (Orientation::Vertical, Orientation::Horizontal) => (other, self),
            _ => return None,
        };
        let y = h.p1.y;
        let x = v.p1.x;
        let within_h = x >= h.p1.x.min(h.p2.x) && x <= h.p1.x.max(h.p2.x);
        let within_v = y >= v.p1.y.min(v.p2.y) && y <= v.p1.y.max(v.p2.y);
        if within_h && within_v {
            Some(Point::new(x, y))
        } else {
            None
        }
    }

    /// Snaps both endpoints of every ruling in `rulings` onto a grid with
    /// spacing `tolerance`, so near-equal floating point coordinates
    /// compare equal after bucketing. See spec design note: floating point
    /// equality on ruling coordinates is avoided by snap-then-compare.
    pub fn snap_all(rulings: &mut [Ruling], tolerance: f64) {
        if tolerance <= 0.0 {
            return;
        }
        for ruling in rulings.iter_mut() {
            ruling.p1.x = snap_value(ruling.p1.x, tolerance);
            ruling.p1.y = snap_value(ruling.p1.y, tolerance);
            ruling.p2.x = snap_value(ruling.p2.x, tolerance);
            ruling.p2.y = snap_value(ruling.p2.y, tolerance);
        }
    }

    /// Merges colinear, near-adjacent rulings of the same orientation into
    /// longer ones, bridging gaps of up to `expansion` units. Rulings on
    /// different axis positions (after accounting for `expansion`) are
    /// left distinct.
    pub fn collapse_oriented_rulings(rulings: &[Ruling], expansion: f64) -> Vec<Ruling> {
        let mut by_axis: Vec<(f64, Vec<Ruling>)> = Vec::new();

        for &r in rulings {
            let orientation = r.normalized_orientation();
            let axis = match orientation {
                Orientation::Horizontal => r.p1.y,
                Orientation::Vertical => r.p1.x,
            };
            if let Some((_, group)) = by_axis
                .iter_mut()
                .find(|(a, group)| (*a - axis).abs() <= expansion && group[0].normalized_orientation() == orientation)
            {
                group.push(r);
            } else {
                by_axis.push((axis, vec![r]));
            }
        }

        let mut result = Vec::new();
        for (_, mut group) in by_axis {
            match group[0].normalized_orientation() {
                Orientation::Horizontal => {
                    group.sort_by(|a, b| a.p1.x.partial_cmp(&b.p1.x).unwrap_or(std::cmp::Ordering::Equal));
                    result.extend(merge_intervals_h(&group, expansion));
                }
                Orientation::Vertical => {
                    group.sort_by(|a, b| a.p1.y.partial_cmp(&b.p1.y).unwrap_or(std::cmp::Ordering::Equal));
                    result.extend(merge_intervals_v(&group, expansion));
                }
            }
        }
        result
    }
}

fn merge_intervals_h(sorted: &[Ruling], expansion: f64) -> Vec<Ruling> {
    let mut out: Vec<Ruling> = Vec::new();
    for r in sorted {
        if let Some(last) = out.last_mut() {
            if r.p1.x <= last.p2.x + expansion {
                last.p2.x = last.p2.x.max(r.p2.x);
                continue;
            }
        }
        out.push(*r);
    }
    out
}

fn merge_intervals_v(sorted: &[Ruling], expansion: f64) -> Vec<Ruling> {
    let mut out: Vec<Ruling> = Vec::new();
    for r in sorted {
        if let Some(last) = out.last_mut() {
            if r.p1.y <= last.p2.y + expansion {
                last.p2.y = last.p2.y.max(r.p2.y);
                continue;
            }
        }
        out.push(*r);
    }
    out
}

fn snap_value(v: f64, tolerance: f64) -> f64 {
    (v / tolerance).round() * tolerance
}
