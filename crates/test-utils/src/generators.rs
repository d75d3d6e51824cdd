//! Synthetic histogram contents with known contour structure.
//!
//! Every generator returns a [`BinGrid`] over regular axes so tests can
//! reason about bin centres directly.

use plot_common::{BinAxis, BinGrid};

fn unit_axis(nbins: usize) -> BinAxis {
    match BinAxis::regular(nbins.max(1), 0.0, nbins.max(1) as f64) {
        Ok(axis) => axis,
        Err(e) => panic!("unit axis with {} bins: {}", nbins, e),
    }
}

/// Grid of `nx x ny` unit bins spanning `[0, nx] x [0, ny]`, filled by `f(i, j)`.
///
/// Bin `(i, j)` has its centre at `(i + 0.5, j + 0.5)`.
pub fn grid_from_fn<F>(nx: usize, ny: usize, f: F) -> BinGrid
where
    F: FnMut(usize, usize) -> f64,
{
    BinGrid::from_fn(unit_axis(nx), unit_axis(ny), f)
}

/// Every bin holds `value`. No contour crosses such a grid.
pub fn create_plateau_grid(nx: usize, ny: usize, value: f64) -> BinGrid {
    grid_from_fn(nx, ny, |_, _| value)
}

/// Bin `(i, j)` holds `i + j`. Iso-lines are the anti-diagonals.
///
/// # Example
///
/// ```
/// use test_utils::create_diagonal_grid;
/// use plot_common::BinContent;
///
/// let grid = create_diagonal_grid(4, 3);
/// assert_eq!(grid.bin_content(3, 2), 5.0);
/// ```
pub fn create_diagonal_grid(nx: usize, ny: usize) -> BinGrid {
    grid_from_fn(nx, ny, |i, j| (i + j) as f64)
}

/// Bin `(i, j)` holds `i`. Iso-lines are vertical.
pub fn create_ramp_grid(nx: usize, ny: usize) -> BinGrid {
    grid_from_fn(nx, ny, |i, _| i as f64)
}

/// Radially symmetric hill peaking at `peak` in the middle of the grid.
pub fn create_hill_grid(nx: usize, ny: usize, peak: f64) -> BinGrid {
    let cx = nx as f64 / 2.0;
    let cy = ny as f64 / 2.0;
    let sigma = (nx.min(ny) as f64 / 4.0).max(0.5);
    grid_from_fn(nx, ny, |i, j| {
        let dx = i as f64 + 0.5 - cx;
        let dy = j as f64 + 0.5 - cy;
        peak * (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
    })
}

/// 2x2 saddle: high on one diagonal, low on the other.
pub fn create_saddle_grid() -> BinGrid {
    grid_from_fn(2, 2, |i, j| if i == j { 0.0 } else { 10.0 })
}

/// Single bin of `value` in an otherwise zero `nx x ny` grid.
pub fn create_spike_grid(nx: usize, ny: usize, at: (usize, usize), value: f64) -> BinGrid {
    grid_from_fn(nx, ny, |i, j| if (i, j) == at { value } else { 0.0 })
}

/// Deterministic pseudo-random contents in `[min, max)`.
///
/// Uses a fixed linear congruential sequence so failures are reproducible.
pub fn create_noise_grid(nx: usize, ny: usize, seed: u64, min: f64, max: f64) -> BinGrid {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    grid_from_fn(nx, ny, |_, _| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
        min + unit * (max - min)
    })
}
