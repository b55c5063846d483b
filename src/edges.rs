//! Discovering persistent X-alignment across text chunks (spec.md §4.H).
//!
//! These alignments stand in for column boundaries on a page with no
//! rulings: a TextEdge is a left/mid/right X position that a run of
//! chunks kept agreeing on, even as the lines marched down the page.

use crate::geometry::Rectangle;
use crate::text::Line;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of a chunk a [`TextEdge`] tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EdgeKind {
    /// Left edges of chunks.
    Left,
    /// Horizontal centers of chunks.
    Mid,
    /// Right edges of chunks.
    Right,
}

/// A persistent X-alignment discovered across a run of chunks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextEdge {
    /// Which side of the chunk this edge tracks.
    pub kind: EdgeKind,
    /// X position, the tracked range's running average.
    pub x: f64,
    /// Y coordinate of the first captured chunk's top.
    pub top: f64,
    /// Y coordinate of the last captured chunk's bottom.
    pub bottom: f64,
    /// Number of chunks this edge captured.
    pub intersecting_text_row_count: usize,
}

const MID_HALF_RANGE: f64 = 1.5;
const SIDE_HALF_RANGE_BASE: f64 = 2.0;
const BACKTRACK_TOLERANCE: f64 = 2.0;
const MARGIN_TOLERANCE: f64 = 8.0;
const BULLET_X_TOLERANCE: f64 = 5.0;
const BULLET_OVERLAP_THRESHOLD: f64 = 0.9;

/// Half-width of the window a sample must fall into to be absorbed by a
/// range. `Mid` uses a fixed window; `Left`/`Right` tighten as the
/// vertical distance to the range's last sample grows, so chunks far
/// apart on the page must agree more precisely.
fn half_range_size(kind: EdgeKind, distance: f64) -> f64 {
    match kind {
        EdgeKind::Mid => MID_HALF_RANGE,
        EdgeKind::Left | EdgeKind::Right => {
            let d = distance.max(1.0);
            let scale = 60.0 / (d * d.max(10.0).ln());
            SIDE_HALF_RANGE_BASE * scale
        }
    }
}

/// One active, in-progress alignment track.
struct Range {
    kind: EdgeKind,
    avg: f64,
    count: usize,
    top: f64,
    bottom: f64,
    last_y: f64,
    entries: Vec<(f64, f64)>,
}

impl Range {
    fn new(kind: EdgeKind, y: f64, bottom: f64, sample: f64) -> Self {
        Self {
            kind,
            avg: sample,
            count: 1,
            top: y,
            bottom,
            last_y: y,
            entries: vec![(y, sample)],
        }
    }

    fn absorb(&mut self, y: f64, bottom: f64, sample: f64) {
        self.avg = (self.avg * self.count as f64 + sample) / (self.count as f64 + 1.0);
        self.count += 1;
        self.bottom = bottom;
        self.last_y = y;
        self.entries.push((y, sample));
    }

    fn into_edge(self, required: usize) -> Option<TextEdge> {
        if self.count >= required {
            Some(TextEdge {
                kind: self.kind,
                x: self.avg,
                top: self.top,
                bottom: self.bottom,
                intersecting_text_row_count: self.count,
            })
        } else {
            None
        }
    }
}

/// Finds persistent left/mid/right text edges across `lines`, ordered
/// top-to-bottom.
///
/// `text_bounds` is used by the margin post-filter; `required_lines_for_edge`
/// is the minimum sample count ([`crate::config::DetectionConfig::required_lines_for_edge`]).
pub fn find_text_edges(lines: &[Line], text_bounds: Rectangle, required_lines_for_edge: usize) -> Vec<TextEdge> {
    let mut left_ranges: Vec<Range> = Vec::new();
    let mut mid_ranges: Vec<Range> = Vec::new();
    let mut right_ranges: Vec<Range> = Vec::new();
    let mut completed: Vec<TextEdge> = Vec::new();

    for line in lines {
        for chunk in line.non_whitespace_chunks() {
            let top = chunk.bbox.top;
            let bottom = chunk.bbox.bottom();
            let left = chunk.left();
            let mid = chunk.mid();
            let right = chunk.right();

            process_sample(&mut left_ranges, EdgeKind::Left, left, top, bottom);
            process_sample(&mut mid_ranges, EdgeKind::Mid, mid, top, bottom);
            process_sample(&mut right_ranges, EdgeKind::Right, right, top, bottom);

            retire_blown_out(&mut left_ranges, left, right, required_lines_for_edge, &mut completed);
            retire_blown_out(&mut mid_ranges, left, right, required_lines_for_edge, &mut completed);
            retire_blown_out(&mut right_ranges, left, right, required_lines_for_edge, &mut completed);
        }
    }

    for range in left_ranges.into_iter().chain(mid_ranges).chain(right_ranges) {
        if let Some(edge) = range.into_edge(required_lines_for_edge) {
            completed.push(edge);
        }
    }

    apply_margin_filter(&mut completed, text_bounds);
    apply_bullet_reduction(&mut completed);
    completed
}

fn process_sample(ranges: &mut Vec<Range>, kind: EdgeKind, sample: f64, top: f64, bottom: f64) {
    for range in ranges.iter_mut() {
        let distance = (top - range.last_y).abs();
        if (sample - range.avg).abs() < half_range_size(kind, distance) {
            range.absorb(top, bottom, sample);
            return;
        }
    }

    let mut fresh = Range::new(kind, top, bottom, sample);
    if let Some(closest) = ranges
        .iter()
        .min_by(|a, b| (sample - a.avg).abs().partial_cmp(&(sample - b.avg).abs()).unwrap_or(std::cmp::Ordering::Equal))
    {
        let mut backtracked: Vec<(f64, f64)> = closest
            .entries
            .iter()
            .rev()
            .take_while(|(_, s)| (s - sample).abs() <= BACKTRACK_TOLERANCE)
            .copied()
            .collect();
        backtracked.reverse();
        if !backtracked.is_empty() {
            for (y, s) in &backtracked {
                fresh.top = fresh.top.min(*y);
                fresh.avg = (fresh.avg * fresh.count as f64 + s) / (fresh.count as f64 + 1.0);
                fresh.count += 1;
            }
            backtracked.push((top, sample));
            fresh.entries = backtracked;
        }
    }

    ranges.push(fresh);
}

/// Retires any range whose average X now sits inside the current
/// chunk's horizontal span but has clearly drifted from the chunk's own
/// edge — the chunk straddles a position that used to be a boundary.
fn retire_blown_out(ranges: &mut Vec<Range>, chunk_left: f64, chunk_right: f64, required: usize, completed: &mut Vec<TextEdge>) {
    let mut i = 0;
    while i < ranges.len() {
        let within_span = ranges[i].avg >= chunk_left && ranges[i].avg <= chunk_right;
        let edge_sample = match ranges[i].kind {
            EdgeKind::Left => chunk_left,
            EdgeKind::Mid => (chunk_left + chunk_right) / 2.0,
            EdgeKind::Right => chunk_right,
        };
        let half = half_range_size(ranges[i].kind, 1.0);
        if within_span && (edge_sample - ranges[i].avg).abs() > half / 2.0 {
            let range = ranges.remove(i);
            if let Some(edge) = range.into_edge(required) {
                completed.push(edge);
            }
        } else {
            i += 1;
        }
    }
}

/// Drops LEFT edges sitting within [`MARGIN_TOLERANCE`] of the text
/// bounding box's left edge — that's the page margin, not a column.
fn apply_margin_filter(edges: &mut Vec<TextEdge>, text_bounds: Rectangle) {
    edges.retain(|e| !(e.kind == EdgeKind::Left && (e.x - text_bounds.left).abs() <= MARGIN_TOLERANCE));
}

/// Bullet-point reduction: a bulleted list throws off a tight left/mid/right
/// triple per item. Sort by height ascending, and for each edge, drop it if
/// an already-kept edge sits within [`BULLET_X_TOLERANCE`] and their Y spans
/// overlap by more than [`BULLET_OVERLAP_THRESHOLD`].
fn apply_bullet_reduction(edges: &mut Vec<TextEdge>) {
    edges.sort_by(|a, b| {
        (a.bottom - a.top).partial_cmp(&(b.bottom - b.top)).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<TextEdge> = Vec::new();
    'outer: for edge in edges.drain(..) {
        for prev in &kept {
            let x_close = (edge.x - prev.x).abs() <= BULLET_X_TOLERANCE;
            if x_close && vertical_overlap_fraction(prev, &edge) > BULLET_OVERLAP_THRESHOLD {
                continue 'outer;
            }
        }
        kept.push(edge);
    }
    *edges = kept;
}

fn vertical_overlap_fraction(a: &TextEdge, b: &TextEdge) -> f64 {
    let top = a.top.max(b.top);
    let bottom = a.bottom.min(b.bottom);
    let overlap = (bottom - top).max(0.0);
    let shorter = (a.bottom - a.top).min(b.bottom - b.top);
    if shorter <= 0.0 {
        0.0
    } else {
        overlap / shorter
    }
}
