//! Colour palettes and the level-to-colour index policy.

use plot_common::PaletteKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour value in RGBA format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// CSS colour string, `rgb(r,g,b)` or `rgba(r,g,b,a)` when translucent.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Number of colours generated for the gradient palettes.
pub const GRADIENT_COLORS: usize = 255;

/// Number of colours of the HLS rainbow palette.
pub const HLS_COLORS: usize = 50;

const STOPS: [f64; 9] = [0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0];

/// Ordered list of colours indexed by contour level.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Built-in palette.
    pub fn from_kind(kind: PaletteKind) -> Self {
        let (red, green, blue): ([f64; 9], [f64; 9], [f64; 9]) = match kind {
            PaletteKind::HlsRainbow => return Self::hls_rainbow(),
            PaletteKind::DeepSea => (
                [0.0, 9.0, 13.0, 17.0, 24.0, 32.0, 27.0, 25.0, 29.0],
                [0.0, 0.0, 0.0, 2.0, 37.0, 74.0, 113.0, 160.0, 221.0],
                [28.0, 42.0, 59.0, 78.0, 98.0, 129.0, 154.0, 184.0, 221.0],
            ),
            PaletteKind::GreyScale => {
                let grey = [0.0, 32.0, 64.0, 96.0, 128.0, 160.0, 192.0, 224.0, 255.0];
                (grey, grey, grey)
            }
            PaletteKind::DarkBodyRadiator => (
                [0.0, 45.0, 99.0, 156.0, 212.0, 230.0, 237.0, 234.0, 242.0],
                [0.0, 0.0, 0.0, 45.0, 101.0, 168.0, 238.0, 238.0, 243.0],
                [0.0, 1.0, 1.0, 3.0, 9.0, 8.0, 11.0, 95.0, 230.0],
            ),
            PaletteKind::TwoColorHue => (
                [0.0, 22.0, 44.0, 68.0, 93.0, 124.0, 160.0, 192.0, 237.0],
                [0.0, 16.0, 41.0, 67.0, 93.0, 125.0, 162.0, 194.0, 241.0],
                [97.0, 100.0, 99.0, 99.0, 93.0, 68.0, 44.0, 26.0, 74.0],
            ),
            PaletteKind::RainBow => (
                [0.0, 5.0, 15.0, 35.0, 102.0, 196.0, 208.0, 199.0, 110.0],
                [0.0, 48.0, 124.0, 192.0, 206.0, 226.0, 97.0, 16.0, 0.0],
                [99.0, 142.0, 198.0, 201.0, 90.0, 22.0, 13.0, 8.0, 2.0],
            ),
            PaletteKind::InvertedDarkBodyRadiator => (
                [242.0, 234.0, 237.0, 230.0, 212.0, 156.0, 99.0, 45.0, 0.0],
                [243.0, 238.0, 238.0, 168.0, 101.0, 45.0, 0.0, 0.0, 0.0],
                [230.0, 95.0, 11.0, 8.0, 9.0, 3.0, 1.0, 1.0, 0.0],
            ),
            PaletteKind::Bird => (
                scaled([0.2082, 0.0592, 0.0780, 0.0232, 0.1802, 0.5301, 0.8186, 0.9956, 0.9764]),
                scaled([0.1664, 0.3599, 0.5041, 0.6419, 0.7178, 0.7492, 0.7328, 0.7862, 0.9832]),
                scaled([0.5293, 0.8684, 0.8385, 0.7914, 0.6425, 0.4662, 0.3499, 0.1968, 0.0539]),
            ),
            PaletteKind::Cubehelix => (
                scaled([0.0, 0.0956, 0.0098, 0.2124, 0.6905, 0.9242, 0.7914, 0.7596, 1.0]),
                scaled([0.0, 0.1147, 0.3616, 0.5041, 0.4577, 0.4691, 0.6905, 0.9237, 1.0]),
                scaled([0.0, 0.2669, 0.3121, 0.1318, 0.2236, 0.6741, 0.9882, 0.9593, 1.0]),
            ),
            PaletteKind::GreenRedViolet => (
                [13.0, 23.0, 25.0, 63.0, 76.0, 104.0, 137.0, 161.0, 206.0],
                [95.0, 67.0, 37.0, 21.0, 0.0, 12.0, 35.0, 52.0, 79.0],
                [4.0, 3.0, 2.0, 6.0, 11.0, 22.0, 49.0, 98.0, 208.0],
            ),
            PaletteKind::Cool => (
                [33.0, 31.0, 42.0, 68.0, 86.0, 111.0, 141.0, 172.0, 227.0],
                [255.0, 175.0, 145.0, 106.0, 88.0, 55.0, 15.0, 0.0, 0.0],
                [255.0, 205.0, 202.0, 203.0, 208.0, 205.0, 203.0, 206.0, 231.0],
            ),
            PaletteKind::Copper => (
                [0.0, 25.0, 50.0, 79.0, 110.0, 145.0, 181.0, 201.0, 254.0],
                [0.0, 16.0, 30.0, 46.0, 63.0, 82.0, 101.0, 124.0, 179.0],
                [0.0, 12.0, 21.0, 29.0, 39.0, 49.0, 61.0, 74.0, 103.0],
            ),
            PaletteKind::GistEarth => (
                [0.0, 13.0, 30.0, 44.0, 72.0, 120.0, 156.0, 200.0, 247.0],
                [0.0, 36.0, 84.0, 117.0, 141.0, 153.0, 151.0, 158.0, 247.0],
                [0.0, 94.0, 100.0, 82.0, 56.0, 66.0, 76.0, 131.0, 247.0],
            ),
            PaletteKind::Viridis => (
                [26.0, 51.0, 43.0, 33.0, 28.0, 35.0, 74.0, 144.0, 246.0],
                [9.0, 24.0, 55.0, 87.0, 118.0, 150.0, 180.0, 200.0, 222.0],
                [30.0, 96.0, 112.0, 114.0, 112.0, 101.0, 72.0, 35.0, 0.0],
            ),
        };
        Self::gradient_table(&STOPS, &red, &green, &blue, GRADIENT_COLORS)
    }

    /// Piecewise-linear gradient through `(stop, r, g, b)` anchors.
    ///
    /// Each interval `[stops[k-1], stops[k]]` receives
    /// `floor(ncolors * stops[k]) - floor(ncolors * stops[k-1])` colours,
    /// starting at the lower anchor. Anchor arrays shorter than `stops`
    /// truncate the table.
    pub fn gradient_table(
        stops: &[f64],
        red: &[f64],
        green: &[f64],
        blue: &[f64],
        ncolors: usize,
    ) -> Self {
        let anchors = stops.len().min(red.len()).min(green.len()).min(blue.len());
        let total = ncolors as f64;
        let mut colors = Vec::with_capacity(ncolors);

        for g in 1..anchors {
            let steps = (total * stops[g]).floor() - (total * stops[g - 1]).floor();
            if steps <= 0.0 {
                continue;
            }
            for c in 0..steps as usize {
                let c = c as f64;
                colors.push(Color::rgb(
                    channel(red[g - 1] + c * (red[g] - red[g - 1]) / steps),
                    channel(green[g - 1] + c * (green[g] - green[g - 1]) / steps),
                    channel(blue[g - 1] + c * (blue[g] - blue[g - 1]) / steps),
                ));
            }
        }

        Self { colors }
    }

    /// The 50-colour HLS rainbow running from violet (hue 280) to red.
    pub fn hls_rainbow() -> Self {
        let max_hue = 280.0;
        let colors = (0..HLS_COLORS)
            .map(|i| {
                let hue = (max_hue - (i + 1) as f64 * (max_hue / HLS_COLORS as f64)) / 360.0;
                hls_to_rgb(hue, 0.5, 1.0)
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Palette index for contour level `i` of `len` levels.
    ///
    /// Levels are spread over the whole palette, so a palette shorter than
    /// the level set repeats colours and a longer one skips them.
    pub fn calc_color_index(&self, i: usize, len: usize) -> usize {
        let plen = self.colors.len();
        if plen == 0 {
            return 0;
        }
        if len < 2 {
            return plen - 1;
        }
        let index = ((i as f64 + 0.99) * plen as f64 / (len - 1) as f64).floor();
        (index as usize).min(plen - 1)
    }

    pub fn get_color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Colour of contour level `i` of `len` levels.
    pub fn calc_color(&self, i: usize, len: usize) -> Option<Color> {
        self.get_color(self.calc_color_index(i, len))
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::from_kind(PaletteKind::default())
    }
}

fn scaled(fractions: [f64; 9]) -> [f64; 9] {
    fractions.map(|f| f * 255.0)
}

/// Round half up into a colour channel.
fn channel(value: f64) -> u8 {
    (value + 0.5).floor().clamp(0.0, 255.0) as u8
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> Color {
    if s < 1e-300 {
        let v = channel(l * 255.0);
        return Color::rgb(v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Color::rgb(
        channel(hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0),
        channel(hue_to_rgb(p, q, h) * 255.0),
        channel(hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0),
    )
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
