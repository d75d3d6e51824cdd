//! Bin grids for two-dimensional histograms.
//!
//! Bins are addressed with zero-based `(i, j)` indices, `i` along the X axis
//! and `j` along the Y axis. Data is stored row-major (all X bins of row 0
//! first).

use crate::error::{PlotError, PlotResult};
use serde::{Deserialize, Serialize};

/// Binning of one histogram axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BinAxis {
    /// Equidistant bins between `min` and `max`.
    Regular { nbins: usize, min: f64, max: f64 },
    /// Arbitrary bin edges, `nbins + 1` strictly increasing values.
    Variable { edges: Vec<f64> },
}

impl BinAxis {
    /// Create an axis with `nbins` equal bins spanning `[min, max]`.
    pub fn regular(nbins: usize, min: f64, max: f64) -> PlotResult<Self> {
        if nbins == 0 {
            return Err(PlotError::InvalidAxis("axis needs at least one bin".into()));
        }
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(PlotError::InvalidAxis(format!(
                "invalid axis range [{}, {}]",
                min, max
            )));
        }
        Ok(BinAxis::Regular { nbins, min, max })
    }

    /// Create an axis from explicit bin edges.
    pub fn variable(edges: Vec<f64>) -> PlotResult<Self> {
        if edges.len() < 2 {
            return Err(PlotError::InvalidAxis(
                "variable axis needs at least two edges".into(),
            ));
        }
        if edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(PlotError::InvalidAxis(
                "bin edges must be strictly increasing".into(),
            ));
        }
        Ok(BinAxis::Variable { edges })
    }

    /// Number of bins.
    pub fn nbins(&self) -> usize {
        match self {
            BinAxis::Regular { nbins, .. } => *nbins,
            BinAxis::Variable { edges } => edges.len() - 1,
        }
    }

    /// Lower edge of the first bin.
    pub fn min(&self) -> f64 {
        match self {
            BinAxis::Regular { min, .. } => *min,
            BinAxis::Variable { edges } => edges[0],
        }
    }

    /// Upper edge of the last bin.
    pub fn max(&self) -> f64 {
        match self {
            BinAxis::Regular { max, .. } => *max,
            BinAxis::Variable { edges } => edges[edges.len() - 1],
        }
    }

    /// Axis coordinate of a (possibly fractional) bin position.
    ///
    /// Integer positions are bin edges: `bin_edge(0.0)` is the axis minimum,
    /// `bin_edge(nbins)` the maximum, `bin_edge(i + 0.5)` the centre of bin `i`.
    pub fn bin_edge(&self, bin: f64) -> f64 {
        match self {
            BinAxis::Regular { nbins, min, max } => {
                min + bin * (max - min) / *nbins as f64
            }
            BinAxis::Variable { edges } => {
                let nbins = edges.len() - 1;
                if bin <= 0.0 {
                    return edges[0];
                }
                if bin >= nbins as f64 {
                    return edges[nbins];
                }
                let lo = bin.floor() as usize;
                let frac = bin - lo as f64;
                edges[lo] + (edges[lo + 1] - edges[lo]) * frac
            }
        }
    }

    /// Centre of bin `bin`.
    pub fn bin_center(&self, bin: usize) -> f64 {
        self.bin_edge(bin as f64 + 0.5)
    }

    /// Index of the bin containing `value`, shifted by `add` before flooring.
    ///
    /// The result is not clamped; values left of the axis give negative
    /// indices and values right of it give indices `>= nbins`.
    pub fn find_index(&self, value: f64, add: f64) -> i64 {
        match self {
            BinAxis::Regular { nbins, min, max } => {
                let width = (max - min) / *nbins as f64;
                ((value - min) / width + add).floor() as i64
            }
            BinAxis::Variable { edges } => {
                for (k, edge) in edges.iter().enumerate().skip(1) {
                    if value < *edge {
                        return (k as f64 - 1.0 + add).floor() as i64;
                    }
                }
                (edges.len() - 1) as i64
            }
        }
    }
}

/// Read access to the scalar bin contents of a 2D grid.
pub trait BinContent {
    /// Number of bins along X.
    fn nbins_x(&self) -> usize;

    /// Number of bins along Y.
    fn nbins_y(&self) -> usize;

    /// Content of bin `(i, j)`.
    fn bin_content(&self, i: usize, j: usize) -> f64;

    /// Polygon-style grids draw bins whose content equals the colour minimum.
    fn is_poly(&self) -> bool {
        false
    }
}

/// Half-open bin window `[i1, i2) x [j1, j2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinWindow {
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl BinWindow {
    pub fn new(i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self { i1, i2, j1, j2 }
    }

    /// Window covering every bin of `grid`.
    pub fn full<G: BinContent + ?Sized>(grid: &G) -> Self {
        Self::new(0, grid.nbins_x(), 0, grid.nbins_y())
    }

    pub fn is_empty(&self) -> bool {
        self.i1 >= self.i2 || self.j1 >= self.j2
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        i >= self.i1 && i < self.i2 && j >= self.j1 && j < self.j2
    }

    /// Iterate over all `(i, j)` pairs, X fastest.
    pub fn bins(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.j1..self.j2).flat_map(move |j| (self.i1..self.i2).map(move |i| (i, j)))
    }
}

/// Dense 2D histogram grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BinGrid {
    x_axis: BinAxis,
    y_axis: BinAxis,
    data: Vec<f64>,
    poly: bool,
}

impl BinGrid {
    /// Create a grid from row-major data.
    pub fn new(x_axis: BinAxis, y_axis: BinAxis, data: Vec<f64>) -> PlotResult<Self> {
        let (nx, ny) = (x_axis.nbins(), y_axis.nbins());
        if data.len() != nx * ny {
            return Err(PlotError::GridSizeMismatch {
                nx,
                ny,
                expected: nx * ny,
                actual: data.len(),
            });
        }
        Ok(Self {
            x_axis,
            y_axis,
            data,
            poly: false,
        })
    }

    /// Create a grid filled by `f(i, j)`.
    pub fn from_fn<F>(x_axis: BinAxis, y_axis: BinAxis, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let (nx, ny) = (x_axis.nbins(), y_axis.nbins());
        let mut data = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                data.push(f(i, j));
            }
        }
        Self {
            x_axis,
            y_axis,
            data,
            poly: false,
        }
    }

    /// Mark the grid as polygon-style (bins at the colour minimum stay visible).
    pub fn with_poly(mut self, poly: bool) -> Self {
        self.poly = poly;
        self
    }

    pub fn x_axis(&self) -> &BinAxis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &BinAxis {
        &self.y_axis
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Content of bin `(i, j)`, `None` outside the grid.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let nx = self.x_axis.nbins();
        if i >= nx || j >= self.y_axis.nbins() {
            return None;
        }
        self.data.get(j * nx + i).copied()
    }

    /// Overwrite bin `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> PlotResult<()> {
        let (nx, ny) = (self.x_axis.nbins(), self.y_axis.nbins());
        if i >= nx || j >= ny {
            return Err(PlotError::BinOutOfRange { i, j, nx, ny });
        }
        self.data[j * nx + i] = value;
        Ok(())
    }
}

impl BinContent for BinGrid {
    fn nbins_x(&self) -> usize {
        self.x_axis.nbins()
    }

    fn nbins_y(&self) -> usize {
        self.y_axis.nbins()
    }

    fn bin_content(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).unwrap_or(0.0)
    }

    fn is_poly(&self) -> bool {
        self.poly
    }
}

/// Value statistics over a bin window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStats {
    pub min: f64,
    pub max: f64,
    /// Smallest strictly positive content, if any.
    pub min_positive: Option<f64>,
    pub sum: f64,
}

impl GridStats {
    /// Scan the finite contents inside `window`. Returns `None` when the window
    /// holds no finite value.
    pub fn scan<G: BinContent + ?Sized>(grid: &G, window: &BinWindow) -> Option<Self> {
        let mut stats: Option<GridStats> = None;

        for (i, j) in window.bins() {
            let z = grid.bin_content(i, j);
            if !z.is_finite() {
                continue;
            }
            let s = stats.get_or_insert(GridStats {
                min: z,
                max: z,
                min_positive: None,
                sum: 0.0,
            });
            s.min = s.min.min(z);
            s.max = s.max.max(z);
            s.sum += z;
            if z > 0.0 && s.min_positive.map_or(true, |p| z < p) {
                s.min_positive = Some(z);
            }
        }

        stats
    }

    /// Scan the whole grid.
    pub fn global<G: BinContent + ?Sized>(grid: &G) -> Option<Self> {
        Self::scan(grid, &BinWindow::full(grid))
    }
}
