//! Grouping text chunks into lines by vertical band.

use super::TextChunk;
use crate::geometry::Rectangle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered sequence of [`TextChunk`]s sharing a vertical band.
///
/// Two chunks belong to the same line when their vertical projections
/// overlap by at least a per-page threshold (see [`group_into_lines`]).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    /// Chunks on this line, left to right.
    pub chunks: Vec<TextChunk>,
    /// Y coordinate of the line's top edge.
    pub top: f64,
    /// Y coordinate of the line's bottom edge.
    pub bottom: f64,
    /// X coordinate of the leftmost chunk's left edge.
    pub left: f64,
    /// X coordinate of the rightmost chunk's right edge.
    pub right: f64,
}

impl Line {
    fn from_chunks(mut chunks: Vec<TextChunk>) -> Self {
        chunks.sort_by(|a, b| a.left().partial_cmp(&b.left()).unwrap_or(std::cmp::Ordering::Equal));
        let top = chunks.iter().map(|c| c.bbox.top).fold(f64::INFINITY, f64::min);
        let bottom = chunks.iter().map(|c| c.bbox.bottom()).fold(f64::NEG_INFINITY, f64::max);
        let left = chunks.iter().map(|c| c.left()).fold(f64::INFINITY, f64::min);
        let right = chunks.iter().map(|c| c.right()).fold(f64::NEG_INFINITY, f64::max);
        Self {
            chunks,
            top,
            bottom,
            left,
            right,
        }
    }

    /// Bounding rectangle of the line.
    pub fn bbox(&self) -> Rectangle {
        Rectangle::from_edges(self.top, self.left, self.right, self.bottom)
    }

    /// Non-whitespace chunks, in left-to-right order.
    pub fn non_whitespace_chunks(&self) -> impl Iterator<Item = &TextChunk> {
        self.chunks.iter().filter(|c| !c.is_whitespace())
    }

    /// Height of the line's vertical band.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn vertical_overlap_ratio(&self, chunk: &TextChunk) -> f64 {
        let top = self.top.max(chunk.bbox.top);
        let bottom = self.bottom.min(chunk.bbox.bottom());
        let overlap = (bottom - top).max(0.0);
        let shortest = self.height().min(chunk.bbox.height);
        if shortest <= 0.0 {
            0.0
        } else {
            overlap / shortest
        }
    }
}

/// Groups chunks into lines ordered top-to-bottom.
///
/// `overlap_threshold` is the minimum fraction of vertical-projection
/// overlap (relative to the shorter of the two spans) required for a
/// chunk to join an existing line; otherwise it starts a new one.
pub fn group_into_lines(chunks: Vec<TextChunk>, overlap_threshold: f64) -> Vec<Line> {
    let mut sorted = chunks;
    sorted.sort_by(|a, b| a.bbox.top.partial_cmp(&b.bbox.top).unwrap_or(std::cmp::Ordering::Equal));

    let mut groups: Vec<Vec<TextChunk>> = Vec::new();
    'chunks: for chunk in sorted {
        for group in groups.iter_mut() {
            let probe = Line::from_chunks(group.clone());
            if probe.vertical_overlap_ratio(&chunk) >= overlap_threshold {
                group.push(chunk);
                continue 'chunks;
            }
        }
        groups.push(vec![chunk]);
    }

    let mut lines: Vec<Line> = groups.into_iter().map(Line::from_chunks).collect();
    lines.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal));
    lines
}
