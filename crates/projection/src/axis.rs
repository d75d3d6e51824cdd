//! Axis ranges, zoom windows and the resolved linear/log scales.

use serde::{Deserialize, Serialize};

/// Per-axis drawing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisOptions {
    /// Logarithmic axis.
    #[serde(default)]
    pub log: bool,
    /// Values increase towards the frame origin instead of away from it.
    #[serde(default)]
    pub reverse: bool,
}

impl AxisOptions {
    pub fn linear() -> Self {
        Self::default()
    }

    pub fn log() -> Self {
        Self {
            log: true,
            reverse: false,
        }
    }
}

/// Configured range of one axis plus an optional zoom window.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisScale {
    min: f64,
    max: f64,
    zoom: Option<(f64, f64)>,
    options: AxisOptions,
}

impl AxisScale {
    /// Create an axis over `[min, max]`. The bounds are ordered and a
    /// zero-width range is widened so the scale never divides by zero.
    pub fn new(min: f64, max: f64, options: AxisOptions) -> Self {
        let (min, max) = widen(min.min(max), min.max(max));
        Self {
            min,
            max,
            zoom: None,
            options,
        }
    }

    pub fn full_range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn options(&self) -> AxisOptions {
        self.options
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom.is_some()
    }

    /// Restrict the visible range. Empty or inverted windows are ignored.
    pub fn zoom(&mut self, min: f64, max: f64) -> bool {
        if !(min < max) || !min.is_finite() || !max.is_finite() {
            return false;
        }
        self.zoom = Some((min, max));
        true
    }

    /// Drop the zoom window. Returns whether one was set.
    pub fn unzoom(&mut self) -> bool {
        self.zoom.take().is_some()
    }

    /// Zoom window if set, otherwise the full range.
    pub fn visible_range(&self) -> (f64, f64) {
        self.zoom.unwrap_or((self.min, self.max))
    }
}

fn widen(min: f64, max: f64) -> (f64, f64) {
    if min != max {
        (min, max)
    } else if min == 0.0 {
        (-1.0, 1.0)
    } else {
        (min - 0.01 * min.abs(), max + 0.01 * max.abs())
    }
}

/// Resolved mapping between an axis value and a `[0, 1]` frame fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
    pub log: bool,
    pub reverse: bool,
}

impl Scale {
    pub fn new(min: f64, max: f64, options: AxisOptions) -> Self {
        Self {
            min,
            max,
            log: options.log,
            reverse: options.reverse,
        }
    }

    /// Fraction of the frame at which `value` is drawn, 0 at `min` and 1 at
    /// `max` (swapped when reversed). `None` for non-positive values on a
    /// log scale.
    pub fn fraction(&self, value: f64) -> Option<f64> {
        let frac = if self.log {
            if value <= 0.0 {
                return None;
            }
            (value.ln() - self.min.ln()) / (self.max.ln() - self.min.ln())
        } else {
            (value - self.min) / (self.max - self.min)
        };
        Some(if self.reverse { 1.0 - frac } else { frac })
    }

    /// Axis value drawn at frame fraction `frac`.
    pub fn value_at(&self, frac: f64) -> f64 {
        let frac = if self.reverse { 1.0 - frac } else { frac };
        if self.log {
            (self.min.ln() + frac * (self.max.ln() - self.min.ln())).exp()
        } else {
            self.min + frac * (self.max - self.min)
        }
    }
}
