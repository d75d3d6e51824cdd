//! Visible bin window and edge coordinates shared by colour and contour
//! drawing.
//!
//! Edge arrays are indexed by absolute edge number, so `grx[i]` is always
//! the left edge of bin `i` no matter where the window starts. Entries
//! outside `[i1, i2]` hold `NaN`.

use plot_common::{BinAxis, BinGrid, BinWindow, GridStats};
use projection::{Axis, AxisScale, CoordinateMapper, MapperResult};

use crate::error::DrawResult;
use crate::tracer::{Point, TraceWindow};

/// How edge coordinates are computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepareOptions {
    /// Round pixel edges to whole pixels.
    pub rounding: bool,
    /// Extra bins kept beyond each side of a zoom window.
    pub extra: usize,
    /// Fractional bin offset of every edge; 0.5 gives bin centres.
    pub middle: f64,
    /// Keep data-space edges next to the pixel ones.
    pub original: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            rounding: true,
            extra: 0,
            middle: 0.0,
            original: false,
        }
    }
}

impl PrepareOptions {
    /// Options for contour tracing. Projected plots trace in data space and
    /// map the finished chains afterwards.
    pub fn contour(projected: bool) -> Self {
        Self {
            rounding: false,
            extra: 100,
            middle: 0.0,
            original: projected,
        }
    }
}

/// Bin window of a draw together with its edge coordinates and statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorDrawHandle {
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
    /// Pixel position of X edges `i1..=i2`.
    pub grx: Vec<f64>,
    /// Pixel position of Y edges `j1..=j2`.
    pub gry: Vec<f64>,
    /// Data-space X edges, when requested.
    pub origx: Option<Vec<f64>>,
    /// Data-space Y edges, when requested.
    pub origy: Option<Vec<f64>>,
    /// Finite value statistics of the window, `None` when it holds none.
    pub stats: Option<GridStats>,
    /// The mapper draws X vertically.
    pub swapped: bool,
}

impl ColorDrawHandle {
    /// Compute the bin window visible through `mapper` and its edges.
    ///
    /// On a log axis, edges at or below zero cannot be drawn and move the
    /// window start past them.
    pub fn prepare(
        grid: &BinGrid,
        mapper: &CoordinateMapper,
        options: PrepareOptions,
    ) -> DrawResult<Self> {
        let (i1, i2) = select_range(grid.x_axis(), mapper.axis(Axis::X), options.extra);
        let (j1, j2) = select_range(grid.y_axis(), mapper.axis(Axis::Y), options.extra);

        let log_x = mapper.scale(Axis::X).map_or(false, |s| s.log);
        let log_y = mapper.scale(Axis::Y).map_or(false, |s| s.log);

        let x = edge_coordinates(grid.x_axis(), i1, i2, &options, log_x, |v| {
            mapper.to_pixel_x(v)
        })?;
        let y = edge_coordinates(grid.y_axis(), j1, j2, &options, log_y, |v| {
            mapper.to_pixel_y(v)
        })?;

        let window = BinWindow::new(x.start, i2, y.start, j2);
        let stats = GridStats::scan(grid, &window);

        tracing::debug!(
            i1 = window.i1,
            i2 = window.i2,
            j1 = window.j1,
            j2 = window.j2,
            original = options.original,
            "colour draw window prepared"
        );

        Ok(Self {
            i1: window.i1,
            i2: window.i2,
            j1: window.j1,
            j2: window.j2,
            grx: x.pixels,
            gry: y.pixels,
            origx: x.original,
            origy: y.original,
            stats,
            swapped: mapper.is_swapped(),
        })
    }

    pub fn window(&self) -> BinWindow {
        BinWindow::new(self.i1, self.i2, self.j1, self.j2)
    }

    /// Data-space edges were kept.
    pub fn is_original(&self) -> bool {
        self.origx.is_some() && self.origy.is_some()
    }

    /// Window for the tracer: data-space edges when kept, pixel edges
    /// otherwise.
    pub fn trace_window(&self) -> TraceWindow<'_> {
        match (&self.origx, &self.origy) {
            (Some(x), Some(y)) => TraceWindow::new(self.window(), x, y),
            _ => TraceWindow::new(self.window(), &self.grx, &self.gry),
        }
    }

    /// Screen position of a point traced over pixel edges.
    pub fn to_screen(&self, point: Point) -> Point {
        if self.swapped {
            Point::new(point.y, point.x)
        } else {
            point
        }
    }

    /// Map points traced in data space to rounded frame pixels, projecting
    /// them on the way.
    pub fn to_frame_points(
        mapper: &CoordinateMapper,
        points: &[Point],
        out: &mut Vec<Point>,
    ) -> DrawResult<()> {
        out.clear();
        out.reserve(points.len());
        for p in points {
            let (x, y) = mapper.to_pixel(p.x, p.y)?;
            out.push(Point::new(x, y).rounded());
        }
        Ok(())
    }
}

/// Bin range `[first, last)` along one axis, widened by `extra` bins around a
/// zoom window and clamped to the axis.
fn select_range(axis: &BinAxis, scale: Option<&AxisScale>, extra: usize) -> (usize, usize) {
    let nbins = axis.nbins() as i64;
    let extra = extra as f64;
    let (first, last) = match scale.filter(|s| s.is_zoomed()) {
        Some(scale) => {
            let (min, max) = scale.visible_range();
            (
                axis.find_index(min, -extra),
                axis.find_index(max, 1.0 + extra + 0.5),
            )
        }
        None => (0, nbins),
    };
    let clamp = |k: i64| k.clamp(0, nbins) as usize;
    (clamp(first), clamp(last))
}

struct Edges {
    /// First bin whose left edge could be drawn.
    start: usize,
    pixels: Vec<f64>,
    original: Option<Vec<f64>>,
}

fn edge_coordinates<F>(
    axis: &BinAxis,
    first: usize,
    last: usize,
    options: &PrepareOptions,
    log: bool,
    to_pixel: F,
) -> MapperResult<Edges>
where
    F: Fn(f64) -> MapperResult<f64>,
{
    let mut start = first;
    let mut pixels = vec![f64::NAN; last + 1];
    let mut original = options.original.then(|| vec![f64::NAN; last + 1]);

    for k in first..=last {
        let value = axis.bin_edge(k as f64 + options.middle);
        if log && value <= 0.0 {
            start = k + 1;
            continue;
        }
        if let Some(original) = original.as_mut() {
            original[k] = value;
        }
        let pixel = to_pixel(value)?;
        pixels[k] = if options.rounding {
            (pixel + 0.5).floor()
        } else {
            pixel
        };
    }

    Ok(Edges {
        start: start.min(last),
        pixels,
        original,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::AxisOptions;

    fn grid(n: usize) -> BinGrid {
        BinGrid::from_fn(
            BinAxis::regular(n, 0.0, n as f64).unwrap(),
            BinAxis::regular(n, 0.0, n as f64).unwrap(),
            |i, j| (i + j) as f64,
        )
    }

    fn mapper(n: f64) -> CoordinateMapper {
        let mut mapper = CoordinateMapper::new(100.0, 100.0);
        mapper.set_range(Axis::X, 0.0, n, AxisOptions::linear()).unwrap();
        mapper.set_range(Axis::Y, 0.0, n, AxisOptions::linear()).unwrap();
        mapper.prepare().unwrap();
        mapper
    }

    #[test]
    fn test_full_window() {
        let handle = ColorDrawHandle::prepare(&grid(4), &mapper(4.0), PrepareOptions::default())
            .unwrap();
        assert_eq!(handle.window(), BinWindow::new(0, 4, 0, 4));
        assert_eq!(handle.grx, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        // Y grows upwards
        assert_eq!(handle.gry, vec![100.0, 75.0, 50.0, 25.0, 0.0]);
        assert!(handle.origx.is_none());

        let stats = handle.stats.unwrap();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 6.0);
    }

    #[test]
    fn test_zoom_with_extra() {
        let mut m = CoordinateMapper::new(100.0, 100.0);
        m.set_range(Axis::X, 0.0, 10.0, AxisOptions::linear()).unwrap();
        m.set_range(Axis::Y, 0.0, 10.0, AxisOptions::linear()).unwrap();
        m.zoom(Axis::X, 4.0, 6.0);
        m.prepare().unwrap();

        let g = grid(10);
        let handle = ColorDrawHandle::prepare(&g, &m, PrepareOptions::default()).unwrap();
        assert_eq!((handle.i1, handle.i2), (4, 7));
        assert_eq!((handle.j1, handle.j2), (0, 10));

        let options = PrepareOptions {
            extra: 2,
            ..PrepareOptions::default()
        };
        let handle = ColorDrawHandle::prepare(&g, &m, options).unwrap();
        assert_eq!((handle.i1, handle.i2), (2, 9));
        assert!(handle.grx[1].is_nan());
    }

    #[test]
    fn test_original_edges() {
        let handle =
            ColorDrawHandle::prepare(&grid(4), &mapper(4.0), PrepareOptions::contour(true))
                .unwrap();
        assert!(handle.is_original());
        assert_eq!(handle.origx.as_deref(), Some(&[0.0, 1.0, 2.0, 3.0, 4.0][..]));
        let window = handle.trace_window();
        assert_eq!(window.x_edges[4], 4.0);
    }

    #[test]
    fn test_unprepared_mapper() {
        let m = CoordinateMapper::new(100.0, 100.0);
        let err = ColorDrawHandle::prepare(&grid(4), &m, PrepareOptions::default()).unwrap_err();
        assert!(err.is_not_configured());
    }
}
