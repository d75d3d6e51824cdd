//! Error types for drawing preparation.

use plot_common::PlotError;
use projection::MapperError;
use thiserror::Error;

/// Result type alias using DrawError.
pub type DrawResult<T> = Result<T, DrawError>;

/// Errors surfaced while preparing a colour or contour draw.
///
/// Level computation and tracing recover from bad data on their own; only
/// an unusable mapper or malformed plot inputs end up here.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Coordinate mapping failed: {0}")]
    Mapper(#[from] MapperError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}

impl DrawError {
    /// The mapper was queried before `prepare()` completed.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, DrawError::Mapper(MapperError::NotConfigured(_)))
    }
}
