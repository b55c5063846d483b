//! A single positioned glyph or glyph fragment.

use crate::geometry::Rectangle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A glyph or glyph-fragment with position, size, font, and string content.
///
/// Typically one character, though a document parser may hand over
/// multi-character fragments when it already merges adjacent glyphs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextElement {
    /// Text content (often a single character).
    pub text: String,
    /// Bounding rectangle in page coordinates.
    pub bbox: Rectangle,
    /// Font size, in page units.
    pub font_size: f64,
    /// Font name as reported by the document parser.
    pub font_name: String,
}

impl TextElement {
    /// Creates a new text element.
    pub fn new(text: impl Into<String>, bbox: Rectangle, font_size: f64, font_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            font_name: font_name.into(),
        }
    }

    /// True if the element's text is entirely whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.text.trim().is_empty()
    }
}
