//! Merging adjacent text elements into word-like chunks.

use super::TextElement;
use crate::geometry::Rectangle;
use crate::table::RectangularTextContainer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning knobs for merging [`TextElement`]s into [`TextChunk`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkAssemblyConfig {
    /// Minimum fraction of vertical overlap for two elements to be
    /// considered on the same baseline.
    pub baseline_overlap_ratio: f64,
    /// Horizontal gap, as a fraction of font size, beyond which a new
    /// chunk starts even on the same baseline.
    pub word_separation_ratio: f64,
    /// Whether chunks should also require a matching font name to merge.
    /// Vertical-ruling split barriers (spec.md §4.D step 2) are handled
    /// separately by [`merge_elements_with_barriers`].
    pub require_same_font: bool,
}

impl Default for ChunkAssemblyConfig {
    fn default() -> Self {
        Self {
            baseline_overlap_ratio: 0.5,
            word_separation_ratio: 0.3,
            require_same_font: true,
        }
    }
}

/// A contiguous horizontal merge of adjacent [`TextElement`]s on the same
/// baseline, in the same font.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextChunk {
    /// Concatenated text content, left to right.
    pub text: String,
    /// Bounding rectangle spanning every contributing element.
    pub bbox: Rectangle,
    /// Font size of the chunk (taken from its first element).
    pub font_size: f64,
    /// Font name of the chunk (taken from its first element).
    pub font_name: String,
}

impl TextChunk {
    /// Creates a chunk from a single element.
    fn from_element(element: &TextElement) -> Self {
        Self {
            text: element.text.clone(),
            bbox: element.bbox,
            font_size: element.font_size,
            font_name: element.font_name.clone(),
        }
    }

    /// X coordinate of the chunk's left edge.
    pub fn left(&self) -> f64 {
        self.bbox.left
    }

    /// X coordinate of the chunk's right edge.
    pub fn right(&self) -> f64 {
        self.bbox.right()
    }

    /// X coordinate midway between left and right.
    pub fn mid(&self) -> f64 {
        (self.left() + self.right()) / 2.0
    }

    /// True if the chunk's text is entirely whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn extend(&mut self, element: &TextElement) {
        self.text.push_str(&element.text);
        self.bbox = self.bbox.merge(&element.bbox);
    }

    fn vertical_overlap_ratio(&self, element: &TextElement) -> f64 {
        let top = self.bbox.top.max(element.bbox.top);
        let bottom = self.bbox.bottom().min(element.bbox.bottom());
        let overlap = (bottom - top).max(0.0);
        let shortest = self.bbox.height.min(element.bbox.height);
        if shortest <= 0.0 {
            0.0
        } else {
            overlap / shortest
        }
    }
}

impl RectangularTextContainer for TextChunk {
    fn bbox(&self) -> Rectangle {
        self.bbox
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// Merges a left-to-right ordered run of text elements into chunks,
/// without regard to vertical ruling split barriers.
pub fn merge_elements(elements: &[TextElement], config: &ChunkAssemblyConfig) -> Vec<TextChunk> {
    merge_elements_with_barriers(elements, config, &[])
}

/// Merges elements into chunks, additionally splitting a chunk whenever a
/// vertical ruling X-position falls strictly between two elements (spec.md
/// §4.D step 2: "if vertical rulings exist, respect them as split
/// barriers").
pub fn merge_elements_with_barriers(
    elements: &[TextElement],
    config: &ChunkAssemblyConfig,
    barriers: &[f64],
) -> Vec<TextChunk> {
    let mut chunks: Vec<TextChunk> = Vec::new();
    let mut ordered: Vec<&TextElement> = elements.iter().collect();
    ordered.sort_by(|a, b| a.bbox.left.partial_cmp(&b.bbox.left).unwrap_or(std::cmp::Ordering::Equal));

    for element in ordered {
        if let Some(last) = chunks.last_mut() {
            let gap = element.bbox.left - last.right();
            let separation_threshold = last.font_size.max(element.font_size) * config.word_separation_ratio;
            let same_baseline = last.vertical_overlap_ratio(element) >= config.baseline_overlap_ratio;
            let same_font = !config.require_same_font || last.font_name == element.font_name;
            let crosses_barrier = barriers
                .iter()
                .any(|&x| x > last.right() - 0.01 && x < element.bbox.left + 0.01);

            if same_baseline && same_font && gap <= separation_threshold && !crosses_barrier {
                last.extend(element);
                continue;
            }
        }
        chunks.push(TextChunk::from_element(element));
    }

    chunks
}
