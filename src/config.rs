//! Tunable constants and configuration options (spec.md §6).

/// Configuration for the stream extractor ([`crate::stream`]) and column
/// inference ([`crate::columns`]).
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// If supplied, overrides column inference: columns are these sorted
    /// X positions instead of an inferred set.
    pub vertical_ruling_xs: Option<Vec<f64>>,
    /// When true, the stream extractor may reinterpret the page as a
    /// spreadsheet if horizontal rulings per text line exceed
    /// [`StreamConfig::mixed_mode_ratio_threshold`].
    pub mixed_table_extraction_enabled: bool,
    /// Ratio of meaningful horizontal rulings to text lines above which
    /// mixed mode fires. Default `0.33`, per the retained spec value
    /// (historical variants used 0.3; see DESIGN.md).
    pub mixed_mode_ratio_threshold: f64,
    /// Minimum vertical-projection overlap fraction for two chunks to
    /// share a text line.
    pub line_overlap_threshold: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            vertical_ruling_xs: None,
            mixed_table_extraction_enabled: false,
            mixed_mode_ratio_threshold: 0.33,
            line_overlap_threshold: 0.5,
        }
    }
}

impl StreamConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides column inference with explicit vertical ruling X
    /// positions.
    pub fn with_vertical_ruling_xs(mut self, xs: Vec<f64>) -> Self {
        self.vertical_ruling_xs = Some(xs);
        self
    }

    /// Enables or disables mixed-mode extraction.
    pub fn with_mixed_table_extraction(mut self, enabled: bool) -> Self {
        self.mixed_table_extraction_enabled = enabled;
        self
    }

    /// Overrides the mixed-mode ratio threshold.
    pub fn with_mixed_mode_ratio_threshold(mut self, threshold: f64) -> Self {
        self.mixed_mode_ratio_threshold = threshold;
        self
    }
}

/// Tunable constants for the table-area detector ([`crate::detector`]) and
/// its supporting ruling/edge analysis. Defaults match spec.md §6.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Grayscale jump, in intensity units, that marks a candidate pixel
    /// edge.
    pub intensity_threshold: u8,
    /// Minimum run length, in raster pixels, for a horizontal ruling.
    pub h_min_width: f64,
    /// Minimum run length, in raster pixels, for a vertical ruling.
    pub v_min_height: f64,
    /// Distance, in raster pixels, within which detected ruling endpoints
    /// are snapped to a shared grid.
    pub point_snap: f64,
    /// Expansion, in raster pixels, used to bridge small pixel gaps when
    /// collapsing colinear rulings.
    pub collapse_expansion: f64,
    /// Corner-proximity tolerance, in page units, for clustering cells
    /// into a cell-based table area.
    pub cell_corner: f64,
    /// Minimum number of clustered cells to form a cell-based table area.
    pub required_cells_for_table: usize,
    /// Minimum number of aligned chunks for a [`crate::edges::TextEdge`]
    /// to be retained.
    pub required_lines_for_edge: usize,
    /// Padding, in page units, applied when finalizing a table area's
    /// rectangle.
    pub padding: f64,
    /// Overlap ratio at or above which two areas are considered duplicates.
    pub identical_overlap: f64,
    /// Multiplier of average row height used to expand a table area
    /// downward to catch a trailing horizontal ruling.
    pub row_height_bottom_multiplier: f64,
    /// Multiplier of average row height used to expand a table area
    /// upward to catch a leading horizontal ruling.
    pub row_height_top_multiplier: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            intensity_threshold: 25,
            h_min_width: 50.0,
            v_min_height: 10.0,
            point_snap: 8.0,
            collapse_expansion: 5.0,
            cell_corner: 10.0,
            required_cells_for_table: 4,
            required_lines_for_edge: 4,
            padding: 1.0,
            identical_overlap: 0.9,
            row_height_bottom_multiplier: 1.5,
            row_height_top_multiplier: 2.0,
        }
    }
}

impl DetectionConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the minimum cluster size for a cell-based table area.
    pub fn with_required_cells_for_table(mut self, count: usize) -> Self {
        self.required_cells_for_table = count;
        self
    }

    /// Overrides the minimum chunk count for a retained text edge.
    pub fn with_required_lines_for_edge(mut self, count: usize) -> Self {
        self.required_lines_for_edge = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_config_defaults_match_spec() {
        let c = StreamConfig::default();
        assert!(!c.mixed_table_extraction_enabled);
        assert_eq!(c.mixed_mode_ratio_threshold, 0.33);
        assert!(c.vertical_ruling_xs.is_none());
    }

    #[test]
    fn detection_config_defaults_match_spec() {
        let c = DetectionConfig::default();
        assert_eq!(c.intensity_threshold, 25);
        assert_eq!(c.h_min_width, 50.0);
        assert_eq!(c.v_min_height, 10.0);
        assert_eq!(c.cell_corner, 10.0);
        assert_eq!(c.point_snap, 8.0);
        assert_eq!(c.required_lines_for_edge, 4);
        assert_eq!(c.required_cells_for_table, 4);
        assert_eq!(c.identical_overlap, 0.9);
        assert_eq!(c.row_height_bottom_multiplier, 1.5);
        assert_eq!(c.row_height_top_multiplier, 2.0);
    }

    #[test]
    fn stream_config_builder_overrides_one_field() {
        let c = StreamConfig::new().with_mixed_table_extraction(true);
        assert!(c.mixed_table_extraction_enabled);
        assert_eq!(c.mixed_mode_ratio_threshold, 0.33);
    }
}
