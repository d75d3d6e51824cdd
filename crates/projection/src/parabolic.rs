//! Parabolic (Craster) projection.

use std::f64::consts::PI;

/// Project `(l, b)` in degrees.
pub fn project(l: f64, b: f64) -> (f64, f64) {
    (
        l * (2.0 * (2.0 * b / 180.0 * PI / 3.0).cos() - 1.0),
        180.0 * (b / 180.0 * PI / 3.0).sin(),
    )
}
