//! The public `Extractor` API (spec.md §6).
//!
//! This is the crate's single entry point: `detect` locates candidate
//! table rectangles on a page, `extract` reconstructs the tabular matrix
//! for each one, choosing between the stream and spreadsheet strategies
//! per area the way spec.md §2's data flow describes ("for each area, (F)
//! if rulings present and rich, else (D)").

use crate::config::{DetectionConfig, StreamConfig};
use crate::detector::Detector;
use crate::geometry::Rectangle;
use crate::page::Page;
use crate::table::Table;
use crate::text::{merge_elements, ChunkAssemblyConfig};
use crate::{cells, spreadsheet, stream};

#[cfg(feature = "raster")]
use crate::page::{Rasterizer, TextSuppressor};

/// Minimum number of spreadsheet cells an area must yield before the
/// extractor trusts the ruling grid over stream inference for it — below
/// this, the rulings are too sparse to call "present and rich" (spec.md
/// §2's data-flow note).
const MIN_RICH_CELL_COUNT: usize = 4;

/// Which extraction path the [`Extractor`] uses for each detected area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Force the stream (column-inference) path for every area.
    Stream,
    /// Force the spreadsheet (ruling-grid) path for every area.
    Spreadsheet,
    /// Per area, use the spreadsheet path if its ruling grid is present
    /// and rich, else fall back to the stream path. Matches spec.md §2's
    /// existing implicit behavior.
    #[default]
    Auto,
}

/// The crate's public entry point: detection and extraction over a
/// [`Page`], per spec.md §6's "Extractor API".
#[derive(Debug, Clone)]
pub struct Extractor {
    detection: DetectionConfig,
    stream: StreamConfig,
    strategy: Strategy,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            stream: StreamConfig::default(),
            strategy: Strategy::default(),
        }
    }
}

impl Extractor {
    /// Creates an extractor with default configuration and [`Strategy::Auto`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the detector's tunables.
    pub fn with_detection_config(mut self, config: DetectionConfig) -> Self {
        self.detection = config;
        self
    }

    /// Overrides the stream extractor's tunables, including
    /// `mixed_table_extraction_enabled` and `vertical_ruling_xs`.
    pub fn with_stream_config(mut self, config: StreamConfig) -> Self {
        self.stream = config;
        self
    }

    /// Forces a single extraction strategy for every detected area,
    /// instead of [`Strategy::Auto`]'s per-area decision.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Locates candidate table-area rectangles on `page` using the
    /// text-edge-only detection pass (no rasterizer collaborator).
    pub fn detect(&self, page: &dyn Page) -> Vec<Rectangle> {
        let detector = Detector::new(self.detection.clone());
        let (mut areas, cache) = detector.detect(page);
        if areas.is_empty() {
            if let Some(area) = detector.blunt_detect(&cache) {
                areas.push(area);
            }
        }
        areas
    }

    /// As [`Extractor::detect`], but additionally rasterizes `page` to
    /// recover ruling-based table areas (spec.md §4.I steps 1-4), given a
    /// [`Rasterizer`] and [`TextSuppressor`] collaborator.
    #[cfg(feature = "raster")]
    pub fn detect_with_rasterizer<R, T>(&self, page: &dyn Page, rasterizer: &R, suppressor: &T) -> Vec<Rectangle>
    where
        R: Rasterizer,
        T: TextSuppressor,
    {
        let detector = Detector::new(self.detection.clone());
        let (mut areas, cache) = detector.detect_with_rasterizer(page, rasterizer, suppressor);
        if areas.is_empty() {
            if let Some(area) = detector.blunt_detect(&cache) {
                areas.push(area);
            }
        }
        areas
    }

    /// Extracts a [`Table`] for every area [`Extractor::detect`]
    /// finds. A page with no detected areas and no text produces a single
    /// empty table for the whole page (spec.md §7's empty-input policy);
    /// a page with no detected areas but some text produces no tables
    /// (nothing looked like a table).
    pub fn extract(&self, page: &dyn Page) -> Vec<Table> {
        let areas = self.detect(page);
        if areas.is_empty() {
            return self.extract_whole_page(page);
        }
        areas.iter().map(|area| self.extract_area(page, *area)).collect()
    }

    /// As [`Extractor::extract`], but skips column inference (component
    /// C) entirely: every area is extracted with `vertical_ruling_xs` as
    /// its column positions (spec.md §6's `verticalRulingXs` option).
    pub fn extract_with_columns(&self, page: &dyn Page, vertical_ruling_xs: Vec<f64>) -> Vec<Table> {
        let stream_config = self.stream.clone().with_vertical_ruling_xs(vertical_ruling_xs);
        let areas = self.detect(page);
        if areas.is_empty() {
            return vec![stream::extract(page, &stream_config)];
        }
        areas
            .iter()
            .map(|area| {
                let sub = page.area(*area);
                stream::extract(sub.as_ref(), &stream_config)
            })
            .collect()
    }

    fn extract_whole_page(&self, page: &dyn Page) -> Vec<Table> {
        if page.text().iter().all(|e| e.is_whitespace()) {
            return vec![Table::empty(page.bounds())];
        }
        Vec::new()
    }

    fn extract_area(&self, page: &dyn Page, area: Rectangle) -> Table {
        let sub = page.area(area);
        match self.strategy {
            Strategy::Stream => stream::extract(sub.as_ref(), &self.stream),
            Strategy::Spreadsheet => self.extract_spreadsheet(sub.as_ref()),
            Strategy::Auto => {
                if let Some(table) = self.try_spreadsheet_if_rich(sub.as_ref()) {
                    table
                } else {
                    stream::extract(sub.as_ref(), &self.stream)
                }
            }
        }
    }

    fn extract_spreadsheet(&self, page: &dyn Page) -> Table {
        let horizontal = page.horizontal_rulings();
        let vertical = page.vertical_rulings();
        let grid = cells::find_cells(&horizontal, &vertical);
        let chunks = merge_elements(&page.text(), &ChunkAssemblyConfig::default());
        spreadsheet::build_table(&grid, &chunks)
    }

    /// The ruling grid is "present and rich" when it yields at least
    /// [`MIN_RICH_CELL_COUNT`] minimal cells; otherwise `None` so the
    /// caller falls back to stream extraction.
    fn try_spreadsheet_if_rich(&self, page: &dyn Page) -> Option<Table> {
        let horizontal = page.horizontal_rulings();
        let vertical = page.vertical_rulings();
        let grid = cells::find_cells(&horizontal, &vertical);
        if grid.len() < MIN_RICH_CELL_COUNT {
            return None;
        }
        let chunks = merge_elements(&page.text(), &ChunkAssemblyConfig::default());
        Some(spreadsheet::build_table(&grid, &chunks))
    }
}
