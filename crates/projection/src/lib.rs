//! Coordinate mapping from histogram data space to frame pixels.
//!
//! - Linear and logarithmic axes with zoom windows (`axis`)
//! - The stateful [`CoordinateMapper`] (`mapper`)
//! - Whole-sky map projections applied before the axis mapping
//!   (`aitoff`, `mercator`, `sinusoidal`, `parabolic`)

pub mod aitoff;
pub mod axis;
pub mod error;
pub mod mapper;
pub mod mercator;
pub mod parabolic;
pub mod sinusoidal;

pub use axis::{AxisOptions, AxisScale, Scale};
pub use error::{MapperError, MapperResult, ProjectionError};
pub use mapper::{Axis, CoordinateMapper, MapperState, MapperWarning};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rectangular window in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataWindow {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl DataWindow {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Smallest window enclosing all `points`. `None` for an empty slice.
    pub fn enclosing(points: &[(f64, f64)]) -> Option<Self> {
        let (&(x0, y0), rest) = points.split_first()?;
        let mut window = Self::new(x0, x0, y0, y0);
        for &(x, y) in rest {
            window.xmin = window.xmin.min(x);
            window.xmax = window.xmax.max(x);
            window.ymin = window.ymin.min(y);
            window.ymax = window.ymax.max(y);
        }
        Some(window)
    }
}

/// Map projection applied to `(longitude, latitude)`-like data pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    None,
    Aitoff,
    Mercator,
    Sinusoidal,
    Parabolic,
}

impl Projection {
    /// Projection from the numeric drawing option (0 = none ... 4 = parabolic).
    pub fn from_option(option: u8) -> Self {
        match option {
            1 => Projection::Aitoff,
            2 => Projection::Mercator,
            3 => Projection::Sinusoidal,
            4 => Projection::Parabolic,
            _ => Projection::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Projection::None)
    }

    /// Project one data point. `None` is the identity.
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projection::None => (x, y),
            Projection::Aitoff => aitoff::project(x, y),
            Projection::Mercator => mercator::project(x, y),
            Projection::Sinusoidal => sinusoidal::project(x, y),
            Projection::Parabolic => parabolic::project(x, y),
        }
    }

    /// Points whose projections bound the image of `window`.
    ///
    /// The corners are not enough for the curved projections: when the
    /// window crosses the equator or the central meridian, the widest extent
    /// lies on that line, so its end points are added too.
    pub fn extreme_points(&self, window: &DataWindow) -> Result<Vec<(f64, f64)>, ProjectionError> {
        let DataWindow {
            xmin,
            xmax,
            ymin,
            ymax,
        } = *window;
        let crosses_equator = ymin < 0.0 && ymax > 0.0;
        let crosses_meridian = xmin < 0.0 && xmax > 0.0;

        let mut pnts = Vec::with_capacity(8);
        match self {
            Projection::None => {
                pnts.push((xmin, ymin));
                pnts.push((xmax, ymax));
            }
            Projection::Mercator => {
                if !mercator::valid_latitudes(ymin, ymax) {
                    return Err(ProjectionError::LatitudeOutOfRange {
                        projection: *self,
                        ymin,
                        ymax,
                    });
                }
                pnts.push(self.project(xmin, ymin));
                pnts.push(self.project(xmax, ymax));
            }
            Projection::Aitoff | Projection::Sinusoidal | Projection::Parabolic => {
                pnts.push(self.project(xmin, ymin));
                pnts.push(self.project(xmin, ymax));
                pnts.push(self.project(xmax, ymax));
                pnts.push(self.project(xmax, ymin));
                if crosses_equator {
                    // Aitoff is singular exactly at l = +/-360
                    let shrink = if *self == Projection::Aitoff { 0.9999 } else { 1.0 };
                    pnts.push(self.project(xmin * shrink, 0.0));
                    pnts.push(self.project(xmax * shrink, 0.0));
                }
                if crosses_meridian {
                    pnts.push(self.project(0.0, ymin));
                    pnts.push(self.project(0.0, ymax));
                }
            }
        }
        Ok(pnts)
    }

    /// Bounding box of the projected `window`.
    pub fn bounding_box(&self, window: &DataWindow) -> Result<DataWindow, ProjectionError> {
        let pnts = self.extreme_points(window)?;
        Ok(DataWindow::enclosing(&pnts).unwrap_or(*window))
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Projection::None => "none",
            Projection::Aitoff => "aitoff",
            Projection::Mercator => "mercator",
            Projection::Sinusoidal => "sinusoidal",
            Projection::Parabolic => "parabolic",
        };
        f.write_str(name)
    }
}

impl FromStr for Projection {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Projection::None),
            "aitoff" => Ok(Projection::Aitoff),
            "mercator" => Ok(Projection::Mercator),
            "sinusoidal" => Ok(Projection::Sinusoidal),
            "parabolic" => Ok(Projection::Parabolic),
            other => Err(ProjectionError::Unknown(other.to_string())),
        }
    }
}
