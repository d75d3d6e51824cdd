//! Per-bin colour fill ("col" draw option).
//!
//! Every visible bin with a drawable value becomes a pixel rectangle; the
//! rectangles are grouped by palette index so each colour is filled once.

use std::collections::BTreeMap;

use plot_common::{BinContent, DrawStyle};
use serde::Serialize;

use crate::handle::ColorDrawHandle;
use crate::levels::{ContourLevels, IndexPolicy};
use crate::palette::{Color, ColorPalette};

/// Axis-aligned rectangle in frame pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BinRect {
    /// Rectangle spanning two corners in any order.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }
}

/// All rectangles filled with one palette colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBins {
    pub color_index: usize,
    pub color: Option<Color>,
    pub rects: Vec<BinRect>,
}

/// Which bins get a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinColorOptions {
    pub policy: IndexPolicy,
    /// Empty bins without a level get the first colour.
    pub show_empty_bins: bool,
}

impl BinColorOptions {
    pub fn from_style(style: &DrawStyle, poly_grid: bool) -> Self {
        Self {
            policy: IndexPolicy::from_style(style, poly_grid),
            show_empty_bins: style.show_empty_bins,
        }
    }
}

/// Group the bins of `handle`'s window by colour.
///
/// Empty bins are never drawn with col0 (`policy.draw_zero`), and drawn in
/// colour 0 when `show_empty_bins` is set and they have no level otherwise.
/// Groups come out in ascending palette index.
pub fn color_bins<G>(
    grid: &G,
    handle: &ColorDrawHandle,
    levels: &ContourLevels,
    palette: &ColorPalette,
    options: BinColorOptions,
) -> Vec<ColorBins>
where
    G: BinContent + ?Sized,
{
    let mut groups: BTreeMap<usize, Vec<BinRect>> = BTreeMap::new();

    for (i, j) in handle.window().bins() {
        let z = grid.bin_content(i, j);
        let mut index = levels.color_index_for(z, palette, options.policy);
        if z == 0.0 {
            if options.policy.draw_zero {
                continue;
            }
            if index.is_none() && options.show_empty_bins {
                index = Some(0);
            }
        }
        let Some(index) = index else {
            continue;
        };

        let (x0, x1) = (handle.grx[i], handle.grx[i + 1]);
        let (y0, y1) = (handle.gry[j + 1], handle.gry[j]);
        let rect = if handle.swapped {
            BinRect::from_corners(y0, x0, y1, x1)
        } else {
            BinRect::from_corners(x0, y0, x1, y1)
        };
        groups.entry(index).or_default().push(rect);
    }

    tracing::debug!(colors = groups.len(), "bins grouped by colour");

    groups
        .into_iter()
        .map(|(color_index, rects)| ColorBins {
            color_index,
            color: palette.get_color(color_index),
            rects,
        })
        .collect()
}
