//! Iso-line tracing with marching squares over bin centres.
//!
//! Each cell of the trace window spans four neighbouring bin centres,
//! numbered counter-clockwise from `(i, j)`:
//!
//! ```text
//!   3 (i, j+1) ---- 2 (i+1, j+1)
//!       |                |
//!   0 (i, j)   ---- 1 (i+1, j)
//! ```
//!
//! Starting at the lowest corner, the cell boundary is walked once in each
//! direction. Each walk records a crossing for every level passed on a
//! rising edge, so the two walks meet on the same levels from opposite
//! sides. Pairing them gives one directed segment per level crossing, with
//! the higher values always on the same side. Segments are collected per
//! level and finally joined end-to-start into chains.
//!
//! Crossings are interpolated from the lower corner of each edge, so
//! neighbouring cells produce bit-identical shared points and chains can be
//! joined by exact comparison.

use plot_common::{BinContent, BinWindow, OverflowPolicy, TracerLimits};
use serde::{Deserialize, Serialize};

use crate::levels::{band_of, ContourLevels};
use crate::palette::ColorPalette;
use crate::scratch::{with_chain_buffer, with_crossing_buffers, Crossing};

/// A point in 2D space (pixel or data coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates half up to whole units.
    pub fn rounded(self) -> Self {
        Self::new(round_half_up(self.x), round_half_up(self.y))
    }
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Bins to trace plus the coordinates of their edges.
///
/// Edge arrays are indexed by absolute edge number: `x_edges[i]` is the left
/// edge of bin `i`, so they need at least `bins.i2 + 1` entries. Corner
/// coordinates are the midpoints of adjacent edges.
#[derive(Debug, Clone, Copy)]
pub struct TraceWindow<'a> {
    pub bins: BinWindow,
    pub x_edges: &'a [f64],
    pub y_edges: &'a [f64],
}

impl<'a> TraceWindow<'a> {
    pub fn new(bins: BinWindow, x_edges: &'a [f64], y_edges: &'a [f64]) -> Self {
        Self {
            bins,
            x_edges,
            y_edges,
        }
    }

    fn x_center(&self, i: usize) -> f64 {
        (self.x_edges[i] + self.x_edges[i + 1]) / 2.0
    }

    fn y_center(&self, j: usize) -> f64 {
        (self.y_edges[j] + self.y_edges[j + 1]) / 2.0
    }
}

/// One stitched chain handed to the `emit` callback.
#[derive(Debug, Clone, Copy)]
pub struct ContourChain<'a> {
    /// Index of the contour level.
    pub level: usize,
    /// Palette index of the level.
    pub color_index: usize,
    /// Ordered vertices, at least three.
    pub points: &'a [Point],
}

impl ContourChain<'_> {
    /// The chain ends where it started.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 2 && first == last,
            _ => false,
        }
    }

    pub fn to_contour(&self, value: f64) -> Contour {
        Contour {
            level: self.level,
            value,
            color_index: self.color_index,
            closed: self.is_closed(),
            points: self.points.to_vec(),
        }
    }
}

/// An owned contour line.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub level: usize,
    /// Value of the level.
    pub value: f64,
    pub color_index: usize,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Counters of one trace call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Cells visited.
    pub cells: usize,
    /// Cells whose corners fall into different bands.
    pub crossed_cells: usize,
    /// Crossed cells of zero width or height.
    pub degenerate_cells: usize,
    /// Crossed cells dropped by a crossing or re-order limit.
    pub dropped_cells: usize,
    pub stored_segments: usize,
    /// Segments refused by a full level buffer.
    pub rejected_segments: usize,
    pub consumed_segments: usize,
    /// Chains passed to `emit`.
    pub chains: usize,
    /// Chains of a single segment, not emitted.
    pub short_chains: usize,
}

impl TraceStats {
    /// Every stored segment ended up in exactly one chain.
    pub fn is_balanced(&self) -> bool {
        self.stored_segments == self.consumed_segments
    }
}

/// Marching-squares tracer for one level set and palette.
#[derive(Debug, Clone)]
pub struct ContourTracer<'a> {
    levels: &'a ContourLevels,
    palette: &'a ColorPalette,
    limits: TracerLimits,
    round_points: bool,
}

/// Why a crossed cell produced no segments.
enum CellDrop {
    Crossings,
    Reorder,
}

impl<'a> ContourTracer<'a> {
    /// Tracer with default limits, rounding points to whole pixels.
    pub fn new(levels: &'a ContourLevels, palette: &'a ColorPalette) -> Self {
        Self {
            levels,
            palette,
            limits: TracerLimits::default(),
            round_points: true,
        }
    }

    pub fn with_limits(mut self, limits: TracerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Round segment end points to whole units. Disable when tracing in
    /// data coordinates.
    pub fn with_rounding(mut self, round_points: bool) -> Self {
        self.round_points = round_points;
        self
    }

    /// Trace `grid` over `window` and pass every chain to `emit`.
    ///
    /// Levels below the first non-negative one are emitted first, in
    /// descending order, then the remaining levels ascending.
    pub fn trace<G, F>(&self, grid: &G, window: &TraceWindow<'_>, mut emit: F) -> TraceStats
    where
        G: BinContent + ?Sized,
        F: FnMut(ContourChain<'_>),
    {
        let levels = self.levels.levels();
        let mut stats = TraceStats::default();
        if levels.is_empty() {
            return stats;
        }

        let mut segments: Vec<Vec<Point>> = vec![Vec::new(); levels.len()];
        let mut overflowed = vec![false; levels.len()];

        let i_end = window
            .bins
            .i2
            .min(grid.nbins_x())
            .min(window.x_edges.len().saturating_sub(1));
        let j_end = window
            .bins
            .j2
            .min(grid.nbins_y())
            .min(window.y_edges.len().saturating_sub(1));

        with_crossing_buffers(|forward, backward| {
            for j in window.bins.j1..j_end.saturating_sub(1) {
                let y0 = window.y_center(j);
                let y2 = window.y_center(j + 1);

                for i in window.bins.i1..i_end.saturating_sub(1) {
                    stats.cells += 1;

                    let zc = [
                        grid.bin_content(i, j),
                        grid.bin_content(i + 1, j),
                        grid.bin_content(i + 1, j + 1),
                        grid.bin_content(i, j + 1),
                    ];
                    let ir = zc.map(|z| band_of(levels, z));
                    if ir[0] == ir[1] && ir[1] == ir[2] && ir[2] == ir[3] {
                        continue;
                    }
                    stats.crossed_cells += 1;

                    let x0 = window.x_center(i);
                    let x1 = window.x_center(i + 1);
                    if x0 == x1 || y0 == y2 {
                        stats.degenerate_cells += 1;
                        continue;
                    }
                    let corners = [
                        Point::new(x0, y0),
                        Point::new(x1, y0),
                        Point::new(x1, y2),
                        Point::new(x0, y2),
                    ];

                    forward.clear();
                    backward.clear();
                    if let Err(reason) = self.pair_cell(&zc, &ir, &corners, forward, backward) {
                        stats.dropped_cells += 1;
                        match reason {
                            CellDrop::Crossings => tracing::debug!(
                                i = i,
                                j = j,
                                limit = self.limits.max_cell_crossings,
                                "cell crossing limit exceeded, cell dropped"
                            ),
                            CellDrop::Reorder => tracing::debug!(
                                i = i,
                                j = j,
                                limit = self.limits.max_reorder_steps,
                                "cell re-order limit exceeded, cell dropped"
                            ),
                        }
                        continue;
                    }

                    for (start, end) in forward.iter().zip(backward.iter()) {
                        let level = start.level;
                        let buffer = &mut segments[level];
                        if self.limits.level_overflow == OverflowPolicy::Reject
                            && buffer.len() + 2 > self.limits.level_capacity
                        {
                            stats.rejected_segments += 1;
                            if !overflowed[level] {
                                overflowed[level] = true;
                                tracing::warn!(
                                    level = level,
                                    capacity = self.limits.level_capacity,
                                    "contour level buffer full, rejecting segments"
                                );
                            }
                            continue;
                        }
                        let (a, b) = if self.round_points {
                            (start.point.rounded(), end.point.rounded())
                        } else {
                            (start.point, end.point)
                        };
                        buffer.push(a);
                        buffer.push(b);
                        stats.stored_segments += 1;
                    }
                }
            }
        });

        if stats.dropped_cells > 0 {
            tracing::warn!(
                dropped = stats.dropped_cells,
                crossed = stats.crossed_cells,
                "contour cells dropped by tracer limits"
            );
        }

        let first = levels.iter().position(|l| *l >= 0.0).unwrap_or(0);
        for level in (0..first).rev().chain(first..levels.len()) {
            let buffer = &segments[level];
            if buffer.is_empty() {
                continue;
            }
            let color_index = self.palette.calc_color_index(level, levels.len());
            stitch(buffer, &mut stats, |points| {
                emit(ContourChain {
                    level,
                    color_index,
                    points,
                })
            });
        }

        tracing::debug!(
            cells = stats.cells,
            crossed = stats.crossed_cells,
            segments = stats.stored_segments,
            chains = stats.chains,
            "contour trace finished"
        );
        stats
    }

    /// Trace and collect owned contours in emission order.
    pub fn trace_all<G>(&self, grid: &G, window: &TraceWindow<'_>) -> (Vec<Contour>, TraceStats)
    where
        G: BinContent + ?Sized,
    {
        let levels = self.levels.levels();
        let mut contours = Vec::new();
        let stats = self.trace(grid, window, |chain| {
            contours.push(chain.to_contour(levels[chain.level]));
        });
        (contours, stats)
    }

    /// Walk the cell both ways and pair the crossings level by level.
    fn pair_cell(
        &self,
        zc: &[f64; 4],
        ir: &[isize; 4],
        corners: &[Point; 4],
        forward: &mut Vec<Crossing>,
        backward: &mut Vec<Crossing>,
    ) -> Result<(), CellDrop> {
        let start = start_corner(zc);

        let mut n = start;
        for _ in 0..4 {
            let m = (n + 1) % 4;
            self.cross_edge(n, m, zc, ir, corners, forward)?;
            n = m;
        }

        n = start;
        for _ in 0..4 {
            let m = (n + 3) % 4;
            self.cross_edge(n, m, zc, ir, corners, backward)?;
            n = m;
        }

        let pairs = forward.len().min(backward.len());
        forward.truncate(pairs);
        backward.truncate(pairs);

        let mut steps = 0;
        for p in 0..pairs.saturating_sub(1) {
            while forward[p].level != backward[p].level {
                if steps == self.limits.max_reorder_steps {
                    return Err(CellDrop::Reorder);
                }
                backward[p..].rotate_left(1);
                steps += 1;
            }
        }
        Ok(())
    }

    /// Record the crossings of every level passed on the rising edge `n -> m`.
    fn cross_edge(
        &self,
        n: usize,
        m: usize,
        zc: &[f64; 4],
        ir: &[isize; 4],
        corners: &[Point; 4],
        out: &mut Vec<Crossing>,
    ) -> Result<(), CellDrop> {
        let levels = self.levels.levels();
        let (e1, e2) = (zc[n], zc[m]);
        let (p1, p2) = (corners[n], corners[m]);
        let vertical = p1.x == p2.x;
        let tlen = if vertical { p2.y - p1.y } else { p2.x - p1.x };
        let tdif = e2 - e1;

        let mut k = ir[n] + 1;
        while k <= ir[m] {
            if out.len() >= self.limits.max_cell_crossings {
                return Err(CellDrop::Crossings);
            }
            let level = k as usize;
            let offset = tlen * ((levels[level] - e1) / tdif);
            let point = if vertical {
                Point::new(p1.x, p1.y + offset)
            } else {
                Point::new(p1.x + offset, p1.y)
            };
            out.push(Crossing { point, level });
            k += 1;
        }
        Ok(())
    }
}

/// Lowest corner, ties resolved towards corners 0 and 2.
fn start_corner(zc: &[f64; 4]) -> usize {
    let n = if zc[0] <= zc[1] { 0 } else { 1 };
    let m = if zc[2] <= zc[3] { 2 } else { 3 };
    if zc[n] > zc[m] {
        m
    } else {
        n
    }
}

/// Join directed segments (point pairs) into maximal chains.
///
/// A chain grows at its end from segments starting there and at its start
/// from segments ending there, until a full pass adds nothing.
fn stitch<F>(segments: &[Point], stats: &mut TraceStats, mut on_chain: F)
where
    F: FnMut(&[Point]),
{
    let count = segments.len() / 2;
    let mut consumed = vec![false; count];
    let mut next = 0;

    with_chain_buffer(|chain| {
        while let Some(seed) = (next..count).find(|&s| !consumed[s]) {
            next = seed + 1;
            consumed[seed] = true;
            stats.consumed_segments += 1;
            chain.clear();
            chain.push_back(segments[2 * seed]);
            chain.push_back(segments[2 * seed + 1]);

            loop {
                let mut added = 0;
                for s in next..count {
                    if consumed[s] {
                        continue;
                    }
                    let (a, b) = (segments[2 * s], segments[2 * s + 1]);
                    if chain.back() == Some(&a) {
                        chain.push_back(b);
                    } else if chain.front() == Some(&b) {
                        chain.push_front(a);
                    } else {
                        continue;
                    }
                    consumed[s] = true;
                    stats.consumed_segments += 1;
                    added += 1;
                }
                if added == 0 {
                    break;
                }
            }

            if chain.len() > 2 {
                stats.chains += 1;
                on_chain(chain.make_contiguous());
            } else {
                stats.short_chains += 1;
            }
        }
    });
}
