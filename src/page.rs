//! External collaborator traits (spec.md §6).
//!
//! This crate does not parse documents, rasterize pages, or suppress text
//! operators — it consumes those capabilities through the traits below.
//! A real PDF (or other paginated-format) engine implements them; this
//! crate only orchestrates the table-detection and extraction algorithms
//! on top.

use crate::geometry::{Rectangle, Ruling};
use crate::text::TextElement;

/// One logical page: positioned text, rulings, and page geometry.
///
/// Implementations are expected to be cheap to query repeatedly — the
/// detector and extractors call `text()`/`horizontal_rulings()`/etc.
/// multiple times in the course of a single `detect`/`extract` call.
pub trait Page {
    /// All text elements on the page, in no particular order.
    fn text(&self) -> Vec<TextElement>;

    /// Horizontal rulings drawn directly in the document (as opposed to
    /// ones derived from a raster scan).
    fn horizontal_rulings(&self) -> Vec<Ruling>;

    /// Vertical rulings drawn directly in the document.
    fn vertical_rulings(&self) -> Vec<Ruling>;

    /// Page width, in page units.
    fn width(&self) -> f64;

    /// Page height, in page units.
    fn height(&self) -> f64;

    /// The page's bounding rectangle, derived from [`Page::width`] and
    /// [`Page::height`].
    fn bounds(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width(), self.height())
    }

    /// Tight bounding rectangle around all non-whitespace text on the
    /// page.
    fn text_bounds(&self) -> Rectangle {
        let elements: Vec<TextElement> = self.text().into_iter().filter(|e| !e.is_whitespace()).collect();
        if elements.is_empty() {
            return Rectangle::new(0.0, 0.0, 0.0, 0.0);
        }
        elements
            .iter()
            .map(|e| e.bbox)
            .reduce(|acc, bbox| acc.merge(&bbox))
            .unwrap_or(Rectangle::new(0.0, 0.0, 0.0, 0.0))
    }

    /// A sub-page view restricted to the given rectangle — text elements
    /// and rulings outside it are dropped.
    fn area(&self, rect: Rectangle) -> Box<dyn Page>;
}

/// Rasterizes a page to a grayscale image for pixel-based ruling
/// detection (component G).
///
/// Contract: the produced image is 2x page units per pixel along each
/// axis at the fixed 144 DPI this crate's ruling-detector thresholds
/// presume (spec.md §6's `rasterDPI` option).
#[cfg(feature = "raster")]
pub trait Rasterizer {
    /// The collaborator's own error type.
    type Error: std::error::Error + 'static;

    /// Rasterizes `page` to grayscale at `dpi`.
    fn rasterize(&self, page: &dyn Page, dpi: u32) -> std::result::Result<image::GrayImage, Self::Error>;
}

/// Strips glyph-drawing operators from a page's content, so that glyph
/// strokes don't masquerade as rulings during vertical-ruling detection
/// (spec.md §4.G precondition).
pub trait TextSuppressor {
    /// The collaborator's own error type.
    type Error: std::error::Error + 'static;

    /// Returns a page equivalent to `page` but with text-drawing
    /// operators removed.
    fn suppress_text(&self, page: &dyn Page) -> std::result::Result<Box<dyn Page>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rectangle;

    struct FakePage {
        text: Vec<TextElement>,
        width: f64,
        height: f64,
    }

    impl Page for FakePage {
        fn text(&self) -> Vec<TextElement> {
            self.text.clone()
        }

        fn horizontal_rulings(&self) -> Vec<Ruling> {
            Vec::new()
        }

        fn vertical_rulings(&self) -> Vec<Ruling> {
            Vec::new()
        }

        fn width(&self) -> f64 {
            self.width
        }

        fn height(&self) -> f64 {
            self.height
        }

        fn area(&self, rect: Rectangle) -> Box<dyn Page> {
            let text = self
                .text
                .iter()
                .filter(|e| rect.contains(&e.bbox))
                .cloned()
                .collect();
            Box::new(FakePage {
                text,
                width: rect.width,
                height: rect.height,
            })
        }
    }

    #[test]
    fn text_bounds_is_empty_for_blank_page() {
        let page = FakePage {
            text: Vec::new(),
            width: 612.0,
            height: 792.0,
        };
        assert_eq!(page.text_bounds(), Rectangle::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn text_bounds_excludes_whitespace_elements() {
        let page = FakePage {
            text: vec![
                TextElement::new("A", Rectangle::new(10.0, 10.0, 5.0, 5.0), 10.0, "Helvetica"),
                TextElement::new("  ", Rectangle::new(1000.0, 1000.0, 5.0, 5.0), 10.0, "Helvetica"),
            ],
            width: 612.0,
            height: 792.0,
        };
        let bounds = page.text_bounds();
        assert_eq!(bounds, Rectangle::new(10.0, 10.0, 5.0, 5.0));
    }

    #[test]
    fn bounds_uses_width_and_height() {
        let page = FakePage {
            text: Vec::new(),
            width: 100.0,
            height: 200.0,
        };
        assert_eq!(page.bounds(), Rectangle::new(0.0, 0.0, 100.0, 200.0));
    }
}
