//! Text assembly: merging glyphs into word-like chunks and grouping
//! chunks into text lines by their vertical band.

mod chunk;
mod element;
mod line;

pub use chunk::{merge_elements, merge_elements_with_barriers, ChunkAssemblyConfig, TextChunk};
pub use element::TextElement;
pub use line::{group_into_lines, Line};
