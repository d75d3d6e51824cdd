//! Contour level sets and the value-to-level index.
//!
//! A [`ContourLevels`] holds `count + 1` ascending break points. Uniform sets
//! are indexed in closed form, irregular ones (logarithmic or user supplied)
//! by bisection. [`LevelCache`] keeps a level set alive across redraws until
//! its inputs change.

use plot_common::{DrawStyle, GridStats};

use crate::palette::{Color, ColorPalette};

/// Lower bound of the synthetic log window: `1e-4 * max`, four decades.
const LOG_FLOOR_FRACTION: f64 = 1e-4;

/// How values at or below the colour minimum are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexPolicy {
    /// Values below the minimum get level 0 instead of no level ("col0").
    pub draw_zero: bool,
    /// The grid is polygon-style; a value equal to a zero minimum is drawn.
    pub poly_grid: bool,
}

impl IndexPolicy {
    pub fn from_style(style: &DrawStyle, poly_grid: bool) -> Self {
        Self {
            draw_zero: style.draw_zero,
            poly_grid,
        }
    }
}

/// Ascending contour break points plus the colour range they span.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevels {
    levels: Vec<f64>,
    /// Irregular spacing; indexed by bisection.
    custom: bool,
    zmin: f64,
    zmax: f64,
}

impl ContourLevels {
    /// Build `count + 1` levels over `[min, max]`.
    ///
    /// A `count` of zero falls back to `style.number_contours`.
    pub fn build(
        count: usize,
        min: f64,
        max: f64,
        min_positive: Option<f64>,
        log_scale: bool,
        style: &DrawStyle,
    ) -> Self {
        let count = if count < 1 {
            style.number_contours.max(1)
        } else {
            count
        };
        let (min, max) = if min > max { (max, min) } else { (min, max) };

        if log_scale {
            Self::logarithmic(count, min, max, min_positive)
        } else {
            Self::uniform(count, min, max)
        }
    }

    /// Equidistant levels; the first is `min`, the last exactly `max`.
    ///
    /// A zero-width range is widened by 1% of its magnitude, or to
    /// `[-0.01, 0.01]` at zero. A range too narrow for `count` distinct
    /// steps at its magnitude is widened the same way.
    pub fn uniform(count: usize, min: f64, max: f64) -> Self {
        let count = count.max(1);
        let (mut zmin, mut zmax) = if min != max {
            (min, max)
        } else if min == 0.0 {
            (-0.01, 0.01)
        } else {
            (min - 0.01 * min.abs(), max + 0.01 * max.abs())
        };

        let mut levels = equidistant(count, zmin, zmax);
        if !is_strictly_increasing(&levels) && zmin.is_finite() && zmax.is_finite() {
            let magnitude = zmin.abs().max(zmax.abs());
            tracing::warn!(
                count = count,
                min = zmin,
                max = zmax,
                "level step below float resolution, widening range"
            );
            zmin -= 0.01 * magnitude;
            zmax += 0.01 * magnitude;
            levels = equidistant(count, zmin, zmax);
        }

        Self {
            levels,
            custom: false,
            zmin,
            zmax,
        }
    }

    /// Levels uniform in `log10` space.
    ///
    /// Non-positive bounds are replaced: `max <= 0` becomes 1; `min <= 0`
    /// becomes `0.3 * min_positive` (or 1 when `min_positive` is in
    /// `[3, 100]`), and `1e-4 * max` without a positive value.
    pub fn logarithmic(count: usize, min: f64, max: f64, min_positive: Option<f64>) -> Self {
        let count = count.max(1);
        let zmax = if max <= 0.0 { 1.0 } else { max };
        let mut zmin = min;
        if zmin <= 0.0 {
            zmin = match min_positive.filter(|p| *p > 0.0) {
                None => LOG_FLOOR_FRACTION * zmax,
                Some(p) if p < 3.0 || p > 100.0 => 0.3 * p,
                Some(_) => 1.0,
            };
        }
        if zmin >= zmax {
            zmin = LOG_FLOOR_FRACTION * zmax;
        }

        let logmin = zmin.log10();
        let logmax = zmax.log10();
        let dz = (logmax - logmin) / count as f64;

        let mut levels = Vec::with_capacity(count + 1);
        levels.push(zmin);
        for level in 1..count {
            levels.push(10f64.powf(logmin + dz * level as f64));
        }
        levels.push(zmax);

        Self {
            levels,
            custom: true,
            zmin,
            zmax,
        }
    }

    /// User-supplied levels, used as given.
    ///
    /// `zmax` is appended when it lies above the last level. Returns `None`
    /// for fewer than two levels.
    pub fn user(levels: &[f64], zmin: f64, zmax: f64) -> Option<Self> {
        if levels.len() < 2 {
            return None;
        }
        let mut levels = levels.to_vec();
        if levels.last().map_or(false, |last| zmax > *last) {
            levels.push(zmax);
        }
        Some(Self {
            levels,
            custom: true,
            zmin,
            zmax,
        })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Lower end of the colour range.
    pub fn zmin(&self) -> f64 {
        self.zmin
    }

    /// Upper end of the colour range.
    pub fn zmax(&self) -> f64 {
        self.zmax
    }

    pub fn last_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Band of `value` for the tracer: the level just below the first level
    /// greater than `value`, `-1` below all levels.
    ///
    /// `NaN` compares false everywhere and lands in the top band.
    pub fn band_of(&self, value: f64) -> isize {
        band_of(&self.levels, value)
    }

    /// Level index drawn for bin content `value`, `None` when not drawn.
    pub fn index_for(&self, value: f64, policy: IndexPolicy) -> Option<usize> {
        if value.is_nan() || self.levels.is_empty() {
            return None;
        }
        let last = self.last_index();

        if self.custom {
            if value < self.levels[0] {
                return None;
            }
            if value >= self.levels[last] {
                return Some(last);
            }
            let (mut l, mut r) = (0, last);
            while l + 1 < r {
                let mid = (l + r + 1) / 2;
                if self.levels[mid] > value {
                    r = mid;
                } else {
                    l = mid;
                }
            }
            return Some(l);
        }

        if value < self.zmin {
            return policy.draw_zero.then_some(0);
        }
        if value == self.zmin {
            let drawn = self.zmin != 0.0 || policy.draw_zero || policy.poly_grid;
            return drawn.then_some(0);
        }

        let index = (0.01 + (value - self.zmin) * last as f64 / (self.zmax - self.zmin)).floor();
        Some((index as usize).min(last))
    }

    /// Palette index of bin content `value`.
    pub fn color_index_for(
        &self,
        value: f64,
        palette: &ColorPalette,
        policy: IndexPolicy,
    ) -> Option<usize> {
        self.index_for(value, policy)
            .map(|index| palette.calc_color_index(index, self.len()))
    }

    /// Colour of bin content `value`.
    pub fn color_for(&self, value: f64, palette: &ColorPalette, policy: IndexPolicy) -> Option<Color> {
        self.color_index_for(value, palette, policy)
            .and_then(|index| palette.get_color(index))
    }
}

/// Linear band search shared with the tracer.
pub(crate) fn band_of(levels: &[f64], value: f64) -> isize {
    for (k, level) in levels.iter().enumerate() {
        if value < *level {
            return k as isize - 1;
        }
    }
    levels.len() as isize - 1
}

/// Value range and smallest positive value feeding a level build.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZRange {
    pub min: f64,
    pub max: f64,
    pub min_positive: Option<f64>,
}

impl ZRange {
    pub fn new(min: f64, max: f64, min_positive: Option<f64>) -> Self {
        Self {
            min,
            max,
            min_positive,
        }
    }

    /// Choose the range to colour.
    ///
    /// Visible-window statistics are used unless they are flat, then the
    /// whole-grid ones. An explicit `(minimum, maximum)` overrides both and a
    /// non-empty z zoom window overrides everything.
    pub fn select(
        visible: Option<&GridStats>,
        global: Option<&GridStats>,
        explicit: Option<(f64, f64)>,
        zoom: Option<(f64, f64)>,
    ) -> Self {
        let from_stats = |s: &GridStats| ZRange::new(s.min, s.max, s.min_positive);

        let mut range = visible.map(from_stats).unwrap_or_default();
        if range.min == range.max {
            if let Some(global) = global {
                range = from_stats(global);
            }
        }
        if let Some((min, max)) = explicit {
            range.min = min;
            range.max = max;
        }
        if let Some((min, max)) = zoom {
            if min != max {
                range.min = min;
                range.max = max;
            }
        }
        range
    }
}

/// Inputs that determine a level set.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelKey {
    pub count: usize,
    pub range: ZRange,
    pub log_scale: bool,
    /// User contour; used when it has at least two entries.
    pub user_levels: Option<Vec<f64>>,
}

impl LevelKey {
    pub fn new(count: usize, range: ZRange, log_scale: bool) -> Self {
        Self {
            count,
            range,
            log_scale,
            user_levels: None,
        }
    }

    pub fn with_user_levels(mut self, levels: Vec<f64>) -> Self {
        self.count = levels.len();
        self.user_levels = Some(levels);
        self
    }

    fn build(&self, style: &DrawStyle) -> ContourLevels {
        if let Some(user) = self
            .user_levels
            .as_deref()
            .and_then(|l| ContourLevels::user(l, self.range.min, self.range.max))
        {
            return user;
        }
        ContourLevels::build(
            self.count,
            self.range.min,
            self.range.max,
            self.range.min_positive,
            self.log_scale,
            style,
        )
    }
}

/// Level set kept across redraws while its [`LevelKey`] is unchanged.
#[derive(Debug, Default)]
pub struct LevelCache {
    entry: Option<(LevelKey, ContourLevels)>,
    builds: usize,
}

impl LevelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached levels for `key`, rebuilding when the key differs.
    pub fn get_or_build(&mut self, key: LevelKey, style: &DrawStyle) -> &ContourLevels {
        if self.entry.as_ref().map_or(false, |(cached, _)| *cached != key) {
            self.entry = None;
        }
        let builds = &mut self.builds;
        let (_, levels) = self.entry.get_or_insert_with(|| {
            let levels = key.build(style);
            tracing::debug!(
                count = levels.len(),
                zmin = levels.zmin(),
                zmax = levels.zmax(),
                custom = levels.is_custom(),
                "contour levels rebuilt"
            );
            *builds += 1;
            (key, levels)
        });
        levels
    }

    /// Currently cached levels.
    pub fn current(&self) -> Option<&ContourLevels> {
        self.entry.as_ref().map(|(_, levels)| levels)
    }

    /// Force the next lookup to rebuild.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of builds so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

fn equidistant(count: usize, zmin: f64, zmax: f64) -> Vec<f64> {
    let dz = (zmax - zmin) / count as f64;
    let mut levels: Vec<f64> = (0..count).map(|level| zmin + dz * level as f64).collect();
    levels.push(zmax);
    levels
}

fn is_strictly_increasing(levels: &[f64]) -> bool {
    levels.windows(2).all(|w| w[0] < w[1])
}
