//! Orchestrates ruling detection, cell clustering, and the iterative
//! text-edge pass into a final set of table-area rectangles (spec.md
//! §4.I).

use crate::cells;
use crate::config::DetectionConfig;
use crate::edges::{find_text_edges, EdgeKind, TextEdge};
use crate::geometry::{Rectangle, Ruling};
use crate::page::Page;
use crate::text::{group_into_lines, merge_elements_with_barriers, ChunkAssemblyConfig, Line};

#[cfg(feature = "raster")]
use crate::page::{Rasterizer, TextSuppressor};

/// Fraction of page width beyond which a chunk is assumed to be
/// justified paragraph text rather than a table cell, and dropped
/// before line grouping (spec.md §4.I step 5).
const WIDE_CHUNK_PAGE_FRACTION: f64 = 0.38;

/// Which kind of edge group a relevant-edge scan settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeGroup {
    Mid,
    Side,
}

/// Everything the iterative passes of [`Detector::detect`] produce and
/// that [`Detector::blunt_detect`] needs afterward.
///
/// This is an explicit, caller-held snapshot rather than detector-owned
/// mutable state: `blunt_detect` takes one by value, so there is no
/// ordering hazard to enforce at runtime (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct DetectionCache {
    /// Text lines on the page, grouped and filtered per step 5.
    pub lines: Vec<Line>,
    /// Tight bounding rectangle around all non-whitespace text.
    pub text_bounds: Rectangle,
    /// Horizontal rulings available when the areas were computed (from
    /// the page directly, or from the raster detector where available).
    pub horizontal_rulings: Vec<Ruling>,
}

/// Locates candidate table-area rectangles on a page and, given relevant
/// edges already computed, reconstructs the matrix they bound.
pub struct Detector {
    config: DetectionConfig,
}

impl Detector {
    /// Creates a detector with the given tunables.
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Runs the text-edge-only detection pass (spec.md §4.I steps 5, 7-10),
    /// without any ruling or cell-based areas. Suitable when no
    /// [`Rasterizer`]/[`TextSuppressor`] collaborator is available.
    pub fn detect(&self, page: &dyn Page) -> (Vec<Rectangle>, DetectionCache) {
        self.detect_from_rulings(page, Vec::new(), Vec::new())
    }

    /// Runs the full detection pass (spec.md §4.I steps 1-10): rasterizes
    /// the page for horizontal rulings, rasterizes a text-suppressed copy
    /// for vertical rulings, clusters cells into cell-based areas, then
    /// runs the iterative text-edge pass on top.
    #[cfg(feature = "raster")]
    pub fn detect_with_rasterizer<R, T>(
        &self,
        page: &dyn Page,
        rasterizer: &R,
        suppressor: &T,
    ) -> (Vec<Rectangle>, DetectionCache)
    where
        R: Rasterizer,
        T: TextSuppressor,
    {
        let horizontal_raster = self.rasterize_or_warn(page, rasterizer, "horizontal ruling pass");
        let suppressed = match suppressor.suppress_text(page) {
            Ok(p) => Some(p),
            Err(err) => {
                tracing::warn!(error = %err, "text suppression failed before vertical ruling pass");
                None
            }
        };
        let vertical_raster =
            suppressed.and_then(|p| self.rasterize_or_warn(p.as_ref(), rasterizer, "vertical ruling pass"));

        let horizontal = horizontal_raster
            .as_ref()
            .map(|img| crate::raster::detect_rulings(img, &self.config).0)
            .unwrap_or_default();
        let vertical = vertical_raster
            .as_ref()
            .map(|img| crate::raster::detect_rulings(img, &self.config).1)
            .unwrap_or_default();

        let cell_rects = cells::find_cells(&horizontal, &vertical);
        let cell_areas = self.cluster_cell_areas(&cell_rects, &vertical);

        let (mut areas, cache) = self.detect_from_rulings(page, horizontal, vertical);
        let mut combined: Vec<Rectangle> = cell_areas;
        combined.append(&mut areas);
        (dedup_areas(combined, self.config.identical_overlap), cache)
    }

    #[cfg(feature = "raster")]
    fn rasterize_or_warn<R: Rasterizer>(&self, page: &dyn Page, rasterizer: &R, phase: &str) -> Option<image::GrayImage> {
        match rasterizer.rasterize(page, 144) {
            Ok(img) => Some(img),
            Err(err) => {
                let wrapped = crate::error::TableError::RasterizationFailed(err.to_string());
                tracing::warn!(error = %wrapped, phase, "rasterization failed, area list degraded");
                None
            }
        }
    }

    #[cfg(feature = "raster")]
    fn cluster_cell_areas(&self, cell_rects: &[Rectangle], vertical_rulings: &[Ruling]) -> Vec<Rectangle> {
        let mut clusters: Vec<Vec<Rectangle>> = Vec::new();
        for &cell in cell_rects {
            let corner = (cell.left, cell.top);
            if let Some(cluster) = clusters.iter_mut().find(|cluster| {
                cluster.iter().any(|c| {
                    (c.left - corner.0).abs() <= self.config.cell_corner && (c.top - corner.1).abs() <= self.config.cell_corner
                })
            }) {
                cluster.push(cell);
            } else {
                clusters.push(vec![cell]);
            }
        }

        clusters
            .into_iter()
            .filter(|cluster| cluster.len() >= self.config.required_cells_for_table)
            .map(|cluster| {
                let mut area = cluster[0];
                for cell in &cluster[1..] {
                    area = area.merge(cell);
                }
                for ruling in vertical_rulings {
                    if ruling.p1.x >= area.left && ruling.p1.x <= area.right() && ruling.bounds().vertically_overlaps(&area) {
                        area = area.merge(&ruling.bounds());
                    }
                }
                area.pad(self.config.padding)
            })
            .collect()
    }

    /// Shared text-side pipeline: build lines, then run the iterative
    /// text-edge pass, given whatever horizontal/vertical rulings are
    /// available (empty slices when no raster collaborator was used).
    fn detect_from_rulings(
        &self,
        page: &dyn Page,
        horizontal: Vec<Ruling>,
        vertical: Vec<Ruling>,
    ) -> (Vec<Rectangle>, DetectionCache) {
        let barriers: Vec<f64> = vertical.iter().map(|r| r.p1.x).collect();
        let max_chunk_width = page.width() * WIDE_CHUNK_PAGE_FRACTION;
        let chunks = merge_elements_with_barriers(&page.text(), &ChunkAssemblyConfig::default(), &barriers)
            .into_iter()
            .filter(|c| c.bbox.width <= max_chunk_width)
            .collect();
        let lines = group_into_lines(chunks, 0.5);
        let text_bounds = page.text_bounds();

        let areas = self.iterative_text_edge_pass(&lines, text_bounds, &horizontal);

        let cache = DetectionCache {
            lines,
            text_bounds,
            horizontal_rulings: horizontal,
        };
        (dedup_areas(areas, self.config.identical_overlap), cache)
    }

    fn iterative_text_edge_pass(&self, all_lines: &[Line], text_bounds: Rectangle, horizontal_rulings: &[Ruling]) -> Vec<Rectangle> {
        let mut areas: Vec<Rectangle> = Vec::new();

        loop {
            let remaining: Vec<Line> = all_lines
                .iter()
                .filter(|line| !areas.iter().any(|a| a.vertically_overlaps(&line.bbox())))
                .cloned()
                .collect();
            if remaining.is_empty() {
                break;
            }

            let edges = find_text_edges(&remaining, text_bounds, self.config.required_lines_for_edge);
            let Some((group, count)) = relevant_edges(&edges) else {
                break;
            };

            let relevant: Vec<&TextEdge> = edges
                .iter()
                .filter(|e| matches_group(e.kind, group) && e.intersecting_text_row_count >= count)
                .collect();

            match table_from_text(
                &remaining,
                &relevant,
                count,
                horizontal_rulings,
                self.config.row_height_bottom_multiplier,
                self.config.row_height_top_multiplier,
            ) {
                Some(area) => {
                    areas.push(area.pad(self.config.padding));
                }
                None => break,
            }
        }

        areas
    }

    /// The fallback pass (spec.md §4.I `bluntDetect`): relaxes the
    /// edge-count and text-overlap thresholds until some area's vertical
    /// overlap with the text bounding box clears the target.
    pub fn blunt_detect(&self, cache: &DetectionCache) -> Option<Rectangle> {
        for edge_count in (3..=8).rev() {
            let edges = find_text_edges(&cache.lines, cache.text_bounds, self.config.required_lines_for_edge);
            let relevant: Vec<&TextEdge> = edges.iter().filter(|e| e.intersecting_text_row_count >= edge_count).collect();
            if relevant.len() < 3 {
                continue;
            }
            if let Some(area) = table_from_text(
                &cache.lines,
                &relevant,
                edge_count,
                &cache.horizontal_rulings,
                self.config.row_height_bottom_multiplier,
                self.config.row_height_top_multiplier,
            ) {
                let mut threshold = 0.7;
                while threshold >= 0.1 {
                    if area.vertical_overlap_ratio(&cache.text_bounds) > threshold {
                        return Some(area.pad(self.config.padding));
                    }
                    threshold -= 0.1;
                }
            }
        }
        None
    }
}

fn matches_group(kind: EdgeKind, group: EdgeGroup) -> bool {
    match group {
        EdgeGroup::Mid => kind == EdgeKind::Mid,
        EdgeGroup::Side => kind == EdgeKind::Left || kind == EdgeKind::Right,
    }
}

/// Scans edge-counts (by intersecting-row-count) from the largest
/// downward; prefers a mid-edge grouping of at least 2, else a side-edge
/// grouping of at least 3.
fn relevant_edges(edges: &[TextEdge]) -> Option<(EdgeGroup, usize)> {
    let mut counts: Vec<usize> = edges.iter().map(|e| e.intersecting_text_row_count).collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    counts.dedup();

    for count in counts {
        let mid = edges
            .iter()
            .filter(|e| e.kind == EdgeKind::Mid && e.intersecting_text_row_count >= count)
            .count();
        if mid >= 2 {
            return Some((EdgeGroup::Mid, count));
        }
        let side = edges
            .iter()
            .filter(|e| (e.kind == EdgeKind::Left || e.kind == EdgeKind::Right) && e.intersecting_text_row_count >= count)
            .count();
        if side >= 3 {
            return Some((EdgeGroup::Side, count));
        }
    }
    None
}

/// Walks `lines` top-to-bottom, accumulating a run of lines that each
/// intersect enough of `relevant` edges, and closes the run when the row
/// gap grows too large or a line intersects none of them. Each closed
/// run's rectangle is expanded to include a trailing/leading horizontal
/// ruling within `bottom_multiplier`/`top_multiplier` times the run's
/// average row height (spec.md §4.I step 8).
fn table_from_text(
    lines: &[Line],
    relevant: &[&TextEdge],
    count: usize,
    horizontal_rulings: &[Ruling],
    bottom_multiplier: f64,
    top_multiplier: f64,
) -> Option<Rectangle> {
    let slack = if count > 3 { 1 } else { 0 };
    let threshold = count.saturating_sub(slack).max(1);

    let mut best: Option<Rectangle> = None;
    let mut run: Vec<&Line> = Vec::new();
    let mut avg_spacing = 0.0_f64;
    let mut last_top: Option<f64> = None;

    for line in lines {
        let intersected = relevant.iter().filter(|e| e.top <= line.top + 0.5 && e.bottom >= line.bottom - 0.5).count();

        if intersected >= threshold {
            if let Some(top) = last_top {
                let gap = line.top - top;
                if avg_spacing > 0.0 && gap > 2.5 * avg_spacing {
                    flush_run(&mut run, &mut best, avg_spacing, horizontal_rulings, bottom_multiplier, top_multiplier);
                    avg_spacing = 0.0;
                }
            }
            if let Some(top) = last_top {
                let gap = (line.top - top).max(0.0);
                avg_spacing = if run.is_empty() { gap } else { (avg_spacing + gap) / 2.0 };
            }
            last_top = Some(line.top);
            run.push(line);
        } else {
            flush_run(&mut run, &mut best, avg_spacing, horizontal_rulings, bottom_multiplier, top_multiplier);
            last_top = None;
            avg_spacing = 0.0;
        }
    }
    flush_run(&mut run, &mut best, avg_spacing, horizontal_rulings, bottom_multiplier, top_multiplier);

    best
}

/// Closes out `run` (if it has at least two lines), expands its
/// rectangle per step 8's ruling-catching rule, and merges it into
/// `best`.
fn flush_run(
    run: &mut Vec<&Line>,
    best: &mut Option<Rectangle>,
    avg_spacing: f64,
    horizontal_rulings: &[Ruling],
    bottom_multiplier: f64,
    top_multiplier: f64,
) {
    if run.len() >= 2 {
        let rect = run.iter().map(|l| l.bbox()).reduce(|acc, b| acc.merge(&b)).expect("run is non-empty");
        let rect = expand_to_row_height_rulings(rect, avg_spacing, horizontal_rulings, bottom_multiplier, top_multiplier);
        *best = Some(match best.take() {
            Some(existing) => existing.merge(&rect),
            None => rect,
        });
    }
    run.clear();
}

/// Extends `rect`'s top/bottom edges to include the nearest horizontal
/// ruling within `bottom_multiplier`/`top_multiplier` times
/// `avg_row_height` of the rectangle's bottom/top, respectively
/// (spec.md §4.I step 8).
fn expand_to_row_height_rulings(
    rect: Rectangle,
    avg_row_height: f64,
    horizontal_rulings: &[Ruling],
    bottom_multiplier: f64,
    top_multiplier: f64,
) -> Rectangle {
    if avg_row_height <= 0.0 {
        return rect;
    }

    let mut top = rect.top;
    let mut bottom = rect.bottom();
    for ruling in horizontal_rulings {
        let y = ruling.p1.y;
        if y >= bottom && y - bottom <= bottom_multiplier * avg_row_height {
            bottom = y;
        }
        if y <= top && top - y <= top_multiplier * avg_row_height {
            top = y;
        }
    }
    Rectangle::from_edges(top, rect.left, rect.right(), bottom)
}

/// Deterministic area dedup (spec.md §4.I step 10 / §9 design note): sort
/// by area descending, drop each area contained in or ≥`overlap`-overlapped
/// by an earlier retained one.
fn dedup_areas(mut areas: Vec<Rectangle>, overlap: f64) -> Vec<Rectangle> {
    areas.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap_or(std::cmp::Ordering::Equal));
    let mut retained: Vec<Rectangle> = Vec::new();
    for area in areas {
        let duplicate = retained.iter().any(|kept| kept.contains(&area) || kept.overlap_ratio(&area) >= overlap);
        if !duplicate {
            retained.push(area);
        }
    }
    retained
}
