//! Error types for projections and the coordinate mapper.

use thiserror::Error;

use crate::mapper::Axis;
use crate::Projection;

/// Result type alias using MapperError.
pub type MapperResult<T> = Result<T, MapperError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("Unknown projection: {0}")]
    Unknown(String),

    #[error("{projection} projection: latitude range [{ymin}, {ymax}] reaches a pole")]
    LatitudeOutOfRange {
        projection: Projection,
        ymin: f64,
        ymax: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapperError {
    /// Ranges were not set, or changed since the last `prepare()`.
    #[error("Coordinate mapper is not configured (state: {0})")]
    NotConfigured(&'static str),

    #[error("Value {value} cannot be shown on logarithmic {axis} axis")]
    NonPositiveLog { axis: Axis, value: f64 },

    #[error("Invalid range for {axis} axis: [{min}, {max}]")]
    InvalidRange { axis: Axis, min: f64, max: f64 },
}
