//! Error taxonomy shared by every generation stage.

use thiserror::Error;

/// Errors that can occur while building or sampling texture fields.
///
/// None of these are retried: generation is a one-shot offline computation,
/// so any failure aborts the run and no partial maps are returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    /// A normalization step observed a constant field (min == max).
    #[error("Degenerate range in {context}: every value equals {value}")]
    DegenerateRange { context: &'static str, value: f32 },
    /// A field was sampled outside the extent it was constructed over.
    #[error("Point {point:?} lies outside the sampling domain [{lo}, {hi}]")]
    Domain { point: [f32; 3], lo: f32, hi: f32 },
    /// A parameter is outside its valid range.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// Two arrays that must share a shape do not.
    #[error("Shape mismatch: expected {expected} cells, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl TextureError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        TextureError::Configuration(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = TextureError> = std::result::Result<T, E>;
