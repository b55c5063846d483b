//! Shared `Page` fixture for the integration test suite.

use tabula_core::geometry::{Rectangle, Ruling};
use tabula_core::page::Page;
use tabula_core::text::TextElement;

pub struct FixturePage {
    pub text: Vec<TextElement>,
    pub horizontal_rulings: Vec<Ruling>,
    pub vertical_rulings: Vec<Ruling>,
    pub width: f64,
    pub height: f64,
}

impl FixturePage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            text: Vec::new(),
            horizontal_rulings: Vec::new(),
            vertical_rulings: Vec::new(),
            width,
            height,
        }
    }

    pub fn with_word(mut self, top: f64, left: f64, width: f64, height: f64, text: &str) -> Self {
        self.text.push(TextElement::new(text, Rectangle::new(top, left, width, height), height, "Helvetica"));
        self
    }

    pub fn with_horizontal_ruling(mut self, y: f64, x0: f64, x1: f64) -> Self {
        self.horizontal_rulings.push(Ruling::from_coords(x0, y, x1, y));
        self
    }

    pub fn with_vertical_ruling(mut self, x: f64, y0: f64, y1: f64) -> Self {
        self.vertical_rulings.push(Ruling::from_coords(x, y0, x, y1));
        self
    }
}

impl Page for FixturePage {
    fn text(&self) -> Vec<TextElement> {
        self.text.clone()
    }

    fn horizontal_rulings(&self) -> Vec<Ruling> {
        self.horizontal_rulings.clone()
    }

    fn vertical_rulings(&self) -> Vec<Ruling> {
        self.vertical_rulings.clone()
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn area(&self, rect: Rectangle) -> Box<dyn Page> {
        let text = self.text.iter().filter(|e| rect.contains(&e.bbox)).cloned().collect();
        let horizontal_rulings = self.horizontal_rulings.iter().filter(|r| rect.contains(&r.bounds())).cloned().collect();
        let vertical_rulings = self.vertical_rulings.iter().filter(|r| rect.contains(&r.bounds())).cloned().collect();
        Box::new(FixturePage {
            text,
            horizontal_rulings,
            vertical_rulings,
            width: rect.width,
            height: rect.height,
        })
    }
}
