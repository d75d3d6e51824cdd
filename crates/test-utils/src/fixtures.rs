//! Common axis and level fixtures.

/// Level sets with hand-checked properties.
pub mod levels {
    /// Irregular user levels.
    pub const USER: [f64; 4] = [0.5, 2.0, 2.5, 9.0];

    /// Levels straddling zero, used for emission order checks.
    pub const SIGNED: [f64; 5] = [-2.0, -1.0, 0.0, 1.0, 2.0];
}

/// Frame sizes in pixels.
pub mod frames {
    pub const SMALL: (f64, f64) = (100.0, 100.0);
    pub const WIDE: (f64, f64) = (500.0, 300.0);
}

/// Whole-sky data windows in degrees, `(xmin, xmax, ymin, ymax)`.
pub mod sky {
    pub const FULL: (f64, f64, f64, f64) = (-180.0, 180.0, -90.0, 90.0);
}
