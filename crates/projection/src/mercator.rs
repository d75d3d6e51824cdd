//! Mercator projection.
//!
//! Undefined at the poles: latitude windows reaching +/-90 degrees must not
//! be projected (see [`valid_latitudes`]).

use std::f64::consts::PI;

/// Project `(l, b)` in degrees. Longitude is kept, latitude becomes
/// `ln(tan(pi/4 + b/2))`.
pub fn project(l: f64, b: f64) -> (f64, f64) {
    let aid = ((PI / 2.0 + b / 180.0 * PI) / 2.0).tan();
    (l, aid.ln())
}

/// Whether the latitude window `[ymin, ymax]` stays strictly inside the poles.
pub fn valid_latitudes(ymin: f64, ymax: f64) -> bool {
    ymin > -90.0 && ymax < 90.0
}
