//! Error types for histogram grid construction and configuration.

use thiserror::Error;

use crate::style::StyleError;

/// Result type alias using PlotError.
pub type PlotResult<T> = Result<T, PlotError>;

/// Primary error type for building plot inputs.
///
/// Drawing itself never fails: anomalies found while computing levels or
/// tracing contours are corrected or logged. These errors cover malformed
/// inputs handed over by the caller.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Invalid axis: {0}")]
    InvalidAxis(String),

    #[error("Grid data has {actual} values, expected {expected} ({nx}x{ny})")]
    GridSizeMismatch {
        nx: usize,
        ny: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Bin ({i}, {j}) is outside the {nx}x{ny} grid")]
    BinOutOfRange { i: usize, j: usize, nx: usize, ny: usize },

    #[error(transparent)]
    Style(#[from] StyleError),
}

impl PlotError {
    /// Whether the error was caused by the caller's data rather than configuration.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, PlotError::Style(_))
    }
}
