//! Colour and contour draws of a whole grid.
//!
//! [`HistPainter`] owns the draw style, the palette built from it and the
//! level cache, and runs the full pipeline: visible window, colour range,
//! level set, then bin rectangles or traced chains in frame pixels.

use plot_common::{BinContent, BinGrid, DrawStyle, GridStats, PlotError, PlotResult};
use projection::CoordinateMapper;

use crate::bins::{color_bins, BinColorOptions, ColorBins};
use crate::error::{DrawError, DrawResult};
use crate::handle::{ColorDrawHandle, PrepareOptions};
use crate::levels::{ContourLevels, LevelCache, LevelKey, ZRange};
use crate::palette::ColorPalette;
use crate::tracer::{ContourChain, ContourTracer, Point, TraceStats};

/// Level inputs of one draw on top of the style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelRequest {
    /// Number of levels, 0 for the style default.
    pub count: usize,
    /// Logarithmic Z axis.
    pub log_scale: bool,
    /// Explicit colour range `(minimum, maximum)`.
    pub range: Option<(f64, f64)>,
    /// Z zoom window.
    pub zoom: Option<(f64, f64)>,
    /// User contour, used when it has at least two entries.
    pub user_levels: Option<Vec<f64>>,
}

impl LevelRequest {
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Cache key for the levels of a draw over `handle`.
    pub fn key(&self, handle: &ColorDrawHandle, global: Option<&GridStats>) -> LevelKey {
        let range = ZRange::select(handle.stats.as_ref(), global, self.range, self.zoom);
        let key = LevelKey::new(self.count, range, self.log_scale);
        match &self.user_levels {
            Some(levels) => key.with_user_levels(levels.clone()),
            None => key,
        }
    }
}

/// Draw state of one histogram.
#[derive(Debug)]
pub struct HistPainter {
    style: DrawStyle,
    palette: ColorPalette,
    cache: LevelCache,
}

impl HistPainter {
    /// Painter for a validated style.
    pub fn new(style: DrawStyle) -> PlotResult<Self> {
        style.validate().map_err(PlotError::from)?;
        let palette = ColorPalette::from_kind(style.palette);
        Ok(Self {
            style,
            palette,
            cache: LevelCache::new(),
        })
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Replace the palette, e.g. with one shared by a whole canvas.
    pub fn set_palette(&mut self, palette: ColorPalette) {
        self.palette = palette;
    }

    /// Levels of the last draw.
    pub fn levels(&self) -> Option<&ContourLevels> {
        self.cache.current()
    }

    pub fn level_cache(&self) -> &LevelCache {
        &self.cache
    }

    /// Force the next draw to rebuild its levels.
    pub fn invalidate_levels(&mut self) {
        self.cache.invalidate();
    }

    /// Fill every visible bin with its level colour.
    pub fn draw_colors(
        &mut self,
        grid: &BinGrid,
        mapper: &CoordinateMapper,
        request: &LevelRequest,
    ) -> DrawResult<Vec<ColorBins>> {
        let handle = ColorDrawHandle::prepare(grid, mapper, PrepareOptions::default())?;
        let key = request.key(&handle, GridStats::global(grid).as_ref());
        let levels = self.cache.get_or_build(key, &self.style);
        let options = BinColorOptions::from_style(&self.style, grid.is_poly());
        Ok(color_bins(grid, &handle, levels, &self.palette, options))
    }

    /// Trace iso-lines of the visible window and pass each chain, in frame
    /// pixels, to `emit`.
    ///
    /// With a map projection the grid is traced in data space and every
    /// chain is projected afterwards.
    pub fn draw_contours<F>(
        &mut self,
        grid: &BinGrid,
        mapper: &CoordinateMapper,
        request: &LevelRequest,
        mut emit: F,
    ) -> DrawResult<TraceStats>
    where
        F: FnMut(ContourChain<'_>),
    {
        let projected = !mapper.projection().is_none();
        let handle = ColorDrawHandle::prepare(grid, mapper, PrepareOptions::contour(projected))?;
        let key = request.key(&handle, GridStats::global(grid).as_ref());
        let levels = self.cache.get_or_build(key, &self.style);

        let tracer = ContourTracer::new(levels, &self.palette)
            .with_limits(self.style.tracer)
            .with_rounding(!projected);

        let mut mapped: Vec<Point> = Vec::new();
        let mut failure: Option<DrawError> = None;

        let stats = tracer.trace(grid, &handle.trace_window(), |chain| {
            if failure.is_some() {
                return;
            }
            if projected {
                let mapping = ColorDrawHandle::to_frame_points(mapper, chain.points, &mut mapped);
                if let Err(err) = mapping {
                    failure = Some(err);
                    return;
                }
            } else if handle.swapped {
                mapped.clear();
                mapped.extend(chain.points.iter().map(|p| handle.to_screen(*p)));
            } else {
                emit(chain);
                return;
            }
            emit(ContourChain {
                points: &mapped,
                ..chain
            });
        });

        match failure {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }
}
