//! Drawing style configuration.
//!
//! `DrawStyle` holds every setting the contour and palette code reads:
//! the default number of contour levels, the colour palette, the policy for
//! bins at or below the colour minimum, and the tracer's buffer limits.
//! It is loaded once (JSON) and passed by reference into each call.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default number of contour levels.
pub const DEFAULT_NUMBER_CONTOURS: usize = 20;

/// Points per interpolation pass through one cell.
pub const DEFAULT_MAX_CELL_CROSSINGS: usize = 1000;

/// Endpoint rotations allowed per cell before it is dropped.
pub const DEFAULT_MAX_REORDER_STEPS: usize = 2000;

/// Points stored per contour level before the overflow policy applies.
pub const DEFAULT_LEVEL_CAPACITY: usize = 8016;

/// Root drawing style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    /// Number of contour levels used when the caller does not request one.
    #[serde(default = "default_number_contours")]
    pub number_contours: usize,

    /// Colour palette.
    #[serde(default)]
    pub palette: PaletteKind,

    /// Draw bins below or at the colour minimum with the first colour ("col0").
    #[serde(default)]
    pub draw_zero: bool,

    /// Draw empty bins that would otherwise be skipped.
    #[serde(default)]
    pub show_empty_bins: bool,

    /// Contour tracer limits.
    #[serde(default)]
    pub tracer: TracerLimits,
}

fn default_number_contours() -> usize {
    DEFAULT_NUMBER_CONTOURS
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            number_contours: DEFAULT_NUMBER_CONTOURS,
            palette: PaletteKind::default(),
            draw_zero: false,
            show_empty_bins: false,
            tracer: TracerLimits::default(),
        }
    }
}

impl DrawStyle {
    /// Load a style from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| StyleError::IoError(e.to_string()))?;
        let style = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            palette = ?style.palette,
            number_contours = style.number_contours,
            "draw style loaded"
        );
        Ok(style)
    }

    /// Parse a style from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let style: DrawStyle =
            serde_json::from_str(json).map_err(|e| StyleError::ParseError(e.to_string()))?;
        style.validate()?;
        Ok(style)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), StyleError> {
        if self.number_contours == 0 {
            return Err(StyleError::ValidationError(
                "number_contours must be at least 1".into(),
            ));
        }
        self.tracer
            .validate()
            .map_err(|e| StyleError::ValidationError(format!("tracer: {}", e)))
    }
}

/// What to do when a contour level's point buffer is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep growing the buffer; the capacity is only a pre-allocation hint.
    #[default]
    Grow,
    /// Reject further segments for that level.
    Reject,
}

/// Buffer limits applied by the contour tracer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracerLimits {
    /// Maximum interpolated points in one walk around a cell. A cell over
    /// the limit is dropped.
    #[serde(default = "default_max_cell_crossings")]
    pub max_cell_crossings: usize,

    /// Maximum endpoint rotations while pairing crossings of one cell: at
    /// most N rotations are made, and a cell needing one more is dropped.
    #[serde(default = "default_max_reorder_steps")]
    pub max_reorder_steps: usize,

    /// Points kept per level.
    #[serde(default = "default_level_capacity")]
    pub level_capacity: usize,

    #[serde(default)]
    pub level_overflow: OverflowPolicy,
}

fn default_max_cell_crossings() -> usize {
    DEFAULT_MAX_CELL_CROSSINGS
}

fn default_max_reorder_steps() -> usize {
    DEFAULT_MAX_REORDER_STEPS
}

fn default_level_capacity() -> usize {
    DEFAULT_LEVEL_CAPACITY
}

impl Default for TracerLimits {
    fn default() -> Self {
        Self {
            max_cell_crossings: DEFAULT_MAX_CELL_CROSSINGS,
            max_reorder_steps: DEFAULT_MAX_REORDER_STEPS,
            level_capacity: DEFAULT_LEVEL_CAPACITY,
            level_overflow: OverflowPolicy::Grow,
        }
    }
}

impl TracerLimits {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cell_crossings == 0 {
            return Err("max_cell_crossings must be positive".into());
        }
        if self.level_capacity < 2 {
            return Err("level_capacity must hold at least one segment".into());
        }
        Ok(())
    }
}

/// Built-in colour palettes.
///
/// The numeric ids are the ones used by ROOT-style drawing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    /// 50-colour HLS rainbow.
    HlsRainbow,
    DeepSea,
    GreyScale,
    DarkBodyRadiator,
    TwoColorHue,
    RainBow,
    InvertedDarkBodyRadiator,
    #[default]
    Bird,
    Cubehelix,
    GreenRedViolet,
    Cool,
    Copper,
    GistEarth,
    Viridis,
}

impl PaletteKind {
    /// Map a numeric palette id. Unknown ids give the HLS rainbow.
    pub fn from_id(id: u32) -> Self {
        match id {
            51 => PaletteKind::DeepSea,
            52 => PaletteKind::GreyScale,
            53 => PaletteKind::DarkBodyRadiator,
            54 => PaletteKind::TwoColorHue,
            55 => PaletteKind::RainBow,
            56 => PaletteKind::InvertedDarkBodyRadiator,
            57 => PaletteKind::Bird,
            58 => PaletteKind::Cubehelix,
            59 => PaletteKind::GreenRedViolet,
            109 => PaletteKind::Cool,
            110 => PaletteKind::Copper,
            111 => PaletteKind::GistEarth,
            112 => PaletteKind::Viridis,
            _ => PaletteKind::HlsRainbow,
        }
    }

    /// Numeric id, `None` for the HLS rainbow.
    pub fn id(&self) -> Option<u32> {
        match self {
            PaletteKind::HlsRainbow => None,
            PaletteKind::DeepSea => Some(51),
            PaletteKind::GreyScale => Some(52),
            PaletteKind::DarkBodyRadiator => Some(53),
            PaletteKind::TwoColorHue => Some(54),
            PaletteKind::RainBow => Some(55),
            PaletteKind::InvertedDarkBodyRadiator => Some(56),
            PaletteKind::Bird => Some(57),
            PaletteKind::Cubehelix => Some(58),
            PaletteKind::GreenRedViolet => Some(59),
            PaletteKind::Cool => Some(109),
            PaletteKind::Copper => Some(110),
            PaletteKind::GistEarth => Some(111),
            PaletteKind::Viridis => Some(112),
        }
    }
}

/// Style loading errors.
#[derive(Debug, Clone, Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
