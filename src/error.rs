//! Error taxonomy for table detection and extraction.
//!
//! Per the error-handling design: empty input, rasterization failure, and
//! malformed geometry are not errors — they degrade to an empty result.
//! `TableError` is reserved for programmer-contract violations and for
//! collaborator failures ([`crate::page::Rasterizer`],
//! [`crate::page::TextSuppressor`]) that this crate cannot recover from on
//! its own.

use thiserror::Error;

/// Errors surfaced by the table-extraction core.
#[derive(Error, Debug)]
pub enum TableError {
    /// The page's rasterization collaborator failed to produce an image.
    #[error("rasterization failed: {0}")]
    RasterizationFailed(String),

    /// The page's text-suppression collaborator failed to strip glyph
    /// operators ahead of vertical-ruling detection.
    #[error("text suppression failed: {0}")]
    TextSuppressionFailed(String),

    /// A ruling/cell grid could not be resolved into a valid shape.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// A caller invoked an entry point that requires state populated by a
    /// prior call (e.g. `bluntDetect` before `detect`).
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;
