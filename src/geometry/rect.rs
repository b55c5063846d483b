//! Axis-aligned rectangle with the merge/overlap operations every
//! downstream component needs.

use super::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned box in page coordinates.
///
/// `top`/`left` locate the top-left corner; `width`/`height` extend right
/// and down from it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    /// Y coordinate of the top edge.
    pub top: f64,
    /// X coordinate of the left edge.
    pub left: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rectangle {
    /// Creates a new rectangle.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Creates a rectangle from its four edges.
    pub fn from_edges(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Y coordinate of the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// The four corners, starting at top-left and proceeding clockwise.
    pub fn get_points(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }

    /// Bounding-box union of this rectangle with another.
    pub fn merge(&self, other: &Rectangle) -> Rectangle {
        let top = self.top.min(other.top);
        let left = self.left.min(other.left);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rectangle::from_edges(top, left, right, bottom)
    }

    /// Whether `other` lies entirely within this rectangle.
    pub fn contains(&self, other: &Rectangle) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether this rectangle contains a single point.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Whether this rectangle's area overlaps `other`'s at all.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Whether the X-interval of `other` overlaps this rectangle's X-interval.
    pub fn horizontally_overlaps(&self, other: &Rectangle) -> bool {
        self.left < other.right() && other.left < self.right()
    }

    /// Whether the Y-interval of `other` overlaps this rectangle's Y-interval.
    pub fn vertically_overlaps(&self, other: &Rectangle) -> bool {
        self.top < other.bottom() && other.top < self.bottom()
    }

    /// Intersection area, or `None` if the rectangles do not overlap.
    pub fn intersection_area(&self, other: &Rectangle) -> Option<f64> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left.max(other.left);
        let right = self.right().min(other.right());
        let top = self.top.max(other.top);
        let bottom = self.bottom().min(other.bottom());
        Some((right - left).max(0.0) * (bottom - top).max(0.0))
    }

    /// Intersection area divided by the area of the smaller of the two
    /// rectangles; `0.0` if they don't overlap or either has zero area.
    pub fn overlap_ratio(&self, other: &Rectangle) -> f64 {
        let smaller = self.area().min(other.area());
        if smaller <= 0.0 {
            return 0.0;
        }
        match self.intersection_area(other) {
            Some(area) => area / smaller,
            None => 0.0,
        }
    }

    /// Fraction of `other`'s vertical extent covered by this rectangle's
    /// vertical extent.
    pub fn vertical_overlap_ratio(&self, other: &Rectangle) -> f64 {
        if other.height <= 0.0 {
            return 0.0;
        }
        let top = self.top.max(other.top);
        let bottom = self.bottom().min(other.bottom());
        (bottom - top).max(0.0) / other.height
    }

    /// Returns this rectangle padded outward by `amount` on every side.
    pub fn pad(&self, amount: f64) -> Rectangle {
        Rectangle::from_edges(
            self.top - amount,
            self.left - amount,
            self.right() + amount,
            self.bottom() + amount,
        )
    }
}
