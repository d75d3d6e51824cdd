//! Sinusoidal (Sanson-Flamsteed) projection.

use std::f64::consts::PI;

/// Project `(l, b)` in degrees.
pub fn project(l: f64, b: f64) -> (f64, f64) {
    (l * (b / 180.0 * PI).cos(), b)
}
