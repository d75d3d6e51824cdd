//! Aitoff projection.
//!
//! Equal-area-like whole-sky projection used for galactic / celestial maps.
//! Longitude `l` and latitude `b` are in degrees; the result is scaled back
//! to degree-like units so that `(180, 0)` maps to `(180, 0)`.

use std::f64::consts::PI;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Project `(l, b)` in degrees.
pub fn project(l: f64, b: f64) -> (f64, f64) {
    let alpha2 = (l / 2.0) * DEG_TO_RAD;
    let delta = b * DEG_TO_RAD;
    let r2 = 2.0_f64.sqrt();
    let f = 2.0 * r2 / PI;
    let cdec = delta.cos();
    let denom = (1.0 + cdec * alpha2.cos()).sqrt();

    (
        cdec * alpha2.sin() * 2.0 * r2 / denom / f / DEG_TO_RAD,
        delta.sin() * r2 / denom / f / DEG_TO_RAD,
    )
}
