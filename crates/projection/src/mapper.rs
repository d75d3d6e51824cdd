//! Stateful data-space to pixel-space mapper of a drawing frame.
//!
//! The mapper goes through `Unconfigured -> RangeSet -> (Projected) -> Ready`.
//! Both axis ranges must be set and [`CoordinateMapper::prepare`] called
//! before any conversion; every later change to ranges, zoom, swap or
//! projection drops the mapper back out of `Ready` until the next `prepare`.
//!
//! Pixel coordinates follow the SVG convention: X grows to the right, Y grows
//! downwards, the frame spans `[0, width] x [0, height]`. With swapped axes
//! the X data axis is drawn vertically and the Y data axis horizontally.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::axis::{AxisOptions, AxisScale, Scale};
use crate::error::{MapperError, MapperResult, ProjectionError};
use crate::{DataWindow, Projection};

/// Data axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperState {
    Unconfigured,
    RangeSet,
    /// A projection is selected but the projected range is not computed yet.
    Projected,
    Ready,
}

impl MapperState {
    fn name(&self) -> &'static str {
        match self {
            MapperState::Unconfigured => "unconfigured",
            MapperState::RangeSet => "range set",
            MapperState::Projected => "projected",
            MapperState::Ready => "ready",
        }
    }
}

/// Recovered configuration problems, recorded by [`CoordinateMapper::prepare`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapperWarning {
    /// Mercator cannot show the poles; the projection was switched off.
    MercatorLatitudeOutOfRange { ymin: f64, ymax: f64 },
    /// A log axis had a non-positive lower bound, replaced by `min`.
    LogRangeAdjusted { axis: Axis, min: f64 },
}

/// Converts data coordinates into frame pixels.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    width: f64,
    height: f64,
    x_axis: Option<AxisScale>,
    y_axis: Option<AxisScale>,
    swap_xy: bool,
    projection: Projection,
    /// Visible data window before projection, kept for data-space tracing.
    original: Option<DataWindow>,
    scales: Option<(Scale, Scale)>,
    state: MapperState,
    warnings: Vec<MapperWarning>,
}

impl CoordinateMapper {
    /// Mapper for a frame of `width x height` pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            x_axis: None,
            y_axis: None,
            swap_xy: false,
            projection: Projection::None,
            original: None,
            scales: None,
            state: MapperState::Unconfigured,
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> MapperState {
        self.state
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_swapped(&self) -> bool {
        self.swap_xy
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Configured range and zoom of `axis`.
    pub fn axis(&self, axis: Axis) -> Option<&AxisScale> {
        match axis {
            Axis::X => self.x_axis.as_ref(),
            Axis::Y => self.y_axis.as_ref(),
        }
    }

    /// Resolved scale of `axis`, available once `Ready`.
    pub fn scale(&self, axis: Axis) -> Option<&Scale> {
        self.scales.as_ref().map(|(x, y)| match axis {
            Axis::X => x,
            Axis::Y => y,
        })
    }

    /// Visible data window before projection, available once `Ready`.
    pub fn original_window(&self) -> Option<DataWindow> {
        self.original
    }

    /// Warnings recorded by `prepare` since the last `take_warnings`.
    pub fn warnings(&self) -> &[MapperWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<MapperWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn set_frame_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.invalidate();
    }

    /// Set the full range of `axis`.
    pub fn set_range(
        &mut self,
        axis: Axis,
        min: f64,
        max: f64,
        options: AxisOptions,
    ) -> MapperResult<()> {
        if !min.is_finite() || !max.is_finite() {
            return Err(MapperError::InvalidRange { axis, min, max });
        }
        let scale = AxisScale::new(min, max, options);
        match axis {
            Axis::X => self.x_axis = Some(scale),
            Axis::Y => self.y_axis = Some(scale),
        }
        self.invalidate();
        Ok(())
    }

    /// Draw the X data axis vertically and the Y data axis horizontally.
    pub fn set_swapped(&mut self, swap_xy: bool) {
        if self.swap_xy != swap_xy {
            self.swap_xy = swap_xy;
            self.invalidate();
        }
    }

    pub fn set_projection(&mut self, projection: Projection) {
        if self.projection != projection {
            self.projection = projection;
            self.invalidate();
        }
    }

    /// Zoom `axis` to `[min, max]`. Returns false when the window is empty or
    /// the axis has no range yet.
    pub fn zoom(&mut self, axis: Axis, min: f64, max: f64) -> bool {
        let changed = match axis {
            Axis::X => self.x_axis.as_mut().map_or(false, |a| a.zoom(min, max)),
            Axis::Y => self.y_axis.as_mut().map_or(false, |a| a.zoom(min, max)),
        };
        if changed {
            self.invalidate();
        }
        changed
    }

    /// Return `axis` to its full range.
    pub fn unzoom(&mut self, axis: Axis) -> bool {
        let changed = match axis {
            Axis::X => self.x_axis.as_mut().map_or(false, |a| a.unzoom()),
            Axis::Y => self.y_axis.as_mut().map_or(false, |a| a.unzoom()),
        };
        if changed {
            self.invalidate();
        }
        changed
    }

    fn invalidate(&mut self) {
        self.scales = None;
        self.original = None;
        self.state = match (&self.x_axis, &self.y_axis) {
            (Some(_), Some(_)) if self.projection.is_none() => MapperState::RangeSet,
            (Some(_), Some(_)) => MapperState::Projected,
            _ => MapperState::Unconfigured,
        };
    }

    /// Resolve the scales of both axes and enter `Ready`.
    ///
    /// Non-positive lower bounds of log axes are replaced by `1e-4 * max`.
    /// With a projection, the scales span the bounding box of the projected
    /// visible window; a Mercator window reaching a pole switches the
    /// projection off instead.
    pub fn prepare(&mut self) -> MapperResult<()> {
        let (x_axis, y_axis) = match (&self.x_axis, &self.y_axis) {
            (Some(x), Some(y)) => (x.clone(), y.clone()),
            _ => return Err(MapperError::NotConfigured(self.state.name())),
        };

        let (mut xmin, xmax) = x_axis.visible_range();
        let (mut ymin, ymax) = y_axis.visible_range();
        let mut x_opts = x_axis.options();
        let mut y_opts = y_axis.options();

        if x_opts.log {
            xmin = self.fix_log_min(Axis::X, xmin, xmax);
        }
        if y_opts.log {
            ymin = self.fix_log_min(Axis::Y, ymin, ymax);
        }
        let xmax = if x_opts.log && xmax <= 0.0 { 1.0 } else { xmax };
        let ymax = if y_opts.log && ymax <= 0.0 { 1.0 } else { ymax };

        let window = DataWindow::new(xmin, xmax, ymin, ymax);
        let mut bounds = window;

        if !self.projection.is_none() {
            match self.projection.bounding_box(&window) {
                Ok(projected) => {
                    bounds = projected;
                    // projected coordinates are always drawn linearly
                    x_opts.log = false;
                    y_opts.log = false;
                }
                Err(ProjectionError::LatitudeOutOfRange { ymin, ymax, .. }) => {
                    tracing::warn!(
                        ymin = ymin,
                        ymax = ymax,
                        "Mercator projection: latitude out of range, projection disabled"
                    );
                    self.warnings
                        .push(MapperWarning::MercatorLatitudeOutOfRange { ymin, ymax });
                    self.projection = Projection::None;
                }
                Err(ProjectionError::Unknown(_)) => {
                    self.projection = Projection::None;
                }
            }
        }

        let (bxmin, bxmax) = non_degenerate(bounds.xmin, bounds.xmax);
        let (bymin, bymax) = non_degenerate(bounds.ymin, bounds.ymax);

        self.scales = Some((
            Scale::new(bxmin, bxmax, x_opts),
            Scale::new(bymin, bymax, y_opts),
        ));
        self.original = Some(window);
        self.state = MapperState::Ready;

        tracing::debug!(
            projection = %self.projection,
            xmin = bxmin,
            xmax = bxmax,
            ymin = bymin,
            ymax = bymax,
            swap_xy = self.swap_xy,
            "coordinate mapper ready"
        );
        Ok(())
    }

    fn fix_log_min(&mut self, axis: Axis, min: f64, max: f64) -> f64 {
        if min > 0.0 {
            return min;
        }
        let max = if max > 0.0 { max } else { 1.0 };
        let fixed = 1e-4 * max;
        let warning = MapperWarning::LogRangeAdjusted { axis, min: fixed };
        // repeated prepares of an unchanged range report it once
        if !self.warnings.contains(&warning) {
            tracing::warn!(axis = %axis, min = min, fixed = fixed, "non-positive log axis minimum");
            self.warnings.push(warning);
        }
        fixed
    }

    fn ready_scales(&self) -> MapperResult<&(Scale, Scale)> {
        match (&self.scales, self.state) {
            (Some(scales), MapperState::Ready) => Ok(scales),
            _ => Err(MapperError::NotConfigured(self.state.name())),
        }
    }

    /// Pixel coordinate of X value `value` along the screen direction the X
    /// axis is drawn in (horizontal, or vertical when swapped).
    pub fn to_pixel_x(&self, value: f64) -> MapperResult<f64> {
        let (x, _) = self.ready_scales()?;
        let frac = x
            .fraction(value)
            .ok_or(MapperError::NonPositiveLog { axis: Axis::X, value })?;
        Ok(if self.swap_xy {
            (1.0 - frac) * self.height
        } else {
            frac * self.width
        })
    }

    /// Pixel coordinate of Y value `value` along the screen direction the Y
    /// axis is drawn in (vertical, or horizontal when swapped).
    pub fn to_pixel_y(&self, value: f64) -> MapperResult<f64> {
        let (_, y) = self.ready_scales()?;
        let frac = y
            .fraction(value)
            .ok_or(MapperError::NonPositiveLog { axis: Axis::Y, value })?;
        Ok(if self.swap_xy {
            frac * self.width
        } else {
            (1.0 - frac) * self.height
        })
    }

    /// Inverse of [`to_pixel_x`](Self::to_pixel_x).
    pub fn to_data_x(&self, pixel: f64) -> MapperResult<f64> {
        let (x, _) = self.ready_scales()?;
        let frac = if self.swap_xy {
            1.0 - pixel / self.height
        } else {
            pixel / self.width
        };
        Ok(x.value_at(frac))
    }

    /// Inverse of [`to_pixel_y`](Self::to_pixel_y).
    pub fn to_data_y(&self, pixel: f64) -> MapperResult<f64> {
        let (_, y) = self.ready_scales()?;
        let frac = if self.swap_xy {
            pixel / self.width
        } else {
            1.0 - pixel / self.height
        };
        Ok(y.value_at(frac))
    }

    /// Apply the active projection to a data point.
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        self.projection.project(x, y)
    }

    /// Screen position `(horizontal, vertical)` of data point `(x, y)`,
    /// projected first and with swapped axes handled.
    pub fn to_pixel(&self, x: f64, y: f64) -> MapperResult<(f64, f64)> {
        let (px, py) = self.project(x, y);
        let gx = self.to_pixel_x(px)?;
        let gy = self.to_pixel_y(py)?;
        Ok(if self.swap_xy { (gy, gx) } else { (gx, gy) })
    }

    /// Horizontal pixel of a normalized frame coordinate.
    pub fn ndc_to_pixel_x(&self, ndc: f64) -> f64 {
        ndc * self.width
    }

    /// Vertical pixel of a normalized frame coordinate (0 at the bottom).
    pub fn ndc_to_pixel_y(&self, ndc: f64) -> f64 {
        (1.0 - ndc) * self.height
    }
}

fn non_degenerate(min: f64, max: f64) -> (f64, f64) {
    if min < max {
        (min, max)
    } else if min == 0.0 {
        (-1.0, 1.0)
    } else {
        (min - 0.01 * min.abs(), max + 0.01 * max.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_mapper() -> CoordinateMapper {
        let mut mapper = CoordinateMapper::new(500.0, 400.0);
        mapper
            .set_range(Axis::X, 0.0, 100.0, AxisOptions::linear())
            .unwrap();
        mapper
            .set_range(Axis::Y, 0.0, 10.0, AxisOptions::linear())
            .unwrap();
        mapper.prepare().unwrap();
        mapper
    }

    #[test]
    fn test_state_transitions() {
        let mut mapper = CoordinateMapper::new(100.0, 100.0);
        assert_eq!(mapper.state(), MapperState::Unconfigured);
        mapper.set_range(Axis::X, 0.0, 1.0, AxisOptions::linear()).unwrap();
        assert_eq!(mapper.state(), MapperState::Unconfigured);
        mapper.set_range(Axis::Y, 0.0, 1.0, AxisOptions::linear()).unwrap();
        assert_eq!(mapper.state(), MapperState::RangeSet);
        mapper.set_projection(Projection::Sinusoidal);
        assert_eq!(mapper.state(), MapperState::Projected);
        mapper.prepare().unwrap();
        assert_eq!(mapper.state(), MapperState::Ready);
        mapper.zoom(Axis::X, 0.2, 0.4);
        assert_eq!(mapper.state(), MapperState::Projected);
    }

    #[test]
    fn test_query_before_configuration() {
        let mapper = CoordinateMapper::new(100.0, 100.0);
        assert!(matches!(
            mapper.to_pixel_x(1.0),
            Err(MapperError::NotConfigured(_))
        ));

        let mut mapper = CoordinateMapper::new(100.0, 100.0);
        assert!(mapper.prepare().is_err());
    }

    #[test]
    fn test_query_after_change_requires_prepare() {
        let mut mapper = ready_mapper();
        mapper.set_swapped(true);
        assert!(mapper.to_pixel_y(1.0).is_err());
        mapper.prepare().unwrap();
        assert!(mapper.to_pixel_y(1.0).is_ok());
    }

    #[test]
    fn test_linear_pixels() {
        let mapper = ready_mapper();
        assert_eq!(mapper.to_pixel_x(50.0).unwrap(), 250.0);
        assert_eq!(mapper.to_pixel_y(0.0).unwrap(), 400.0);
        assert_eq!(mapper.to_pixel_y(10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_swapped_pixels() {
        let mut mapper = ready_mapper();
        mapper.set_swapped(true);
        mapper.prepare().unwrap();
        // X data runs bottom to top, Y data left to right
        assert_eq!(mapper.to_pixel_x(0.0).unwrap(), 400.0);
        assert_eq!(mapper.to_pixel_y(10.0).unwrap(), 500.0);
        assert_eq!(mapper.to_pixel(100.0, 0.0).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_invalid_range() {
        let mut mapper = CoordinateMapper::new(10.0, 10.0);
        let err = mapper
            .set_range(Axis::X, f64::NAN, 1.0, AxisOptions::linear())
            .unwrap_err();
        assert!(matches!(err, MapperError::InvalidRange { axis: Axis::X, .. }));
    }

    #[test]
    fn test_ndc() {
        let mapper = CoordinateMapper::new(200.0, 100.0);
        assert_eq!(mapper.ndc_to_pixel_x(0.25), 50.0);
        assert_eq!(mapper.ndc_to_pixel_y(0.25), 75.0);
    }
}
