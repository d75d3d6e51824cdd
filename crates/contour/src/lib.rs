//! Colour and contour drawing of 2D histogram grids.
//!
//! - Contour level sets and the value-to-colour index (`levels`)
//! - Colour palettes (`palette`)
//! - Marching-squares iso-line tracing (`tracer`)
//! - Visible window and edge coordinates (`handle`)
//! - Per-bin colour fill (`bins`)
//! - The full draw pipeline (`draw`)

pub mod bins;
pub mod draw;
pub mod error;
pub mod handle;
pub mod levels;
pub mod palette;
pub mod scratch;
pub mod tracer;

pub use bins::{color_bins, BinColorOptions, BinRect, ColorBins};
pub use draw::{HistPainter, LevelRequest};
pub use error::{DrawError, DrawResult};
pub use handle::{ColorDrawHandle, PrepareOptions};
pub use levels::{ContourLevels, IndexPolicy, LevelCache, LevelKey, ZRange};
pub use palette::{Color, ColorPalette};
pub use tracer::{Contour, ContourChain, ContourTracer, Point, TraceStats, TraceWindow};
