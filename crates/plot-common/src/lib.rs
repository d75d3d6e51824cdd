//! Common types shared by the contour and projection crates.
//!
//! - Bin grids and axes (`grid`)
//! - Drawing style / configuration (`style`)
//! - Error types (`error`)

pub mod error;
pub mod grid;
pub mod style;

pub use error::{PlotError, PlotResult};
pub use grid::{BinAxis, BinContent, BinGrid, BinWindow, GridStats};
pub use style::{DrawStyle, OverflowPolicy, PaletteKind, StyleError, TracerLimits};
