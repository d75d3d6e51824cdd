//! Tests for built-in palettes and level colours.

use contour::{Color, ColorPalette, ContourLevels, IndexPolicy};
use plot_common::{DrawStyle, PaletteKind};

const ALL_KINDS: [PaletteKind; 14] = [
    PaletteKind::HlsRainbow,
    PaletteKind::DeepSea,
    PaletteKind::GreyScale,
    PaletteKind::DarkBodyRadiator,
    PaletteKind::TwoColorHue,
    PaletteKind::RainBow,
    PaletteKind::InvertedDarkBodyRadiator,
    PaletteKind::Bird,
    PaletteKind::Cubehelix,
    PaletteKind::GreenRedViolet,
    PaletteKind::Cool,
    PaletteKind::Copper,
    PaletteKind::GistEarth,
    PaletteKind::Viridis,
];

// ============================================================================
// Built-in palettes
// ============================================================================

#[test]
fn test_every_palette_is_opaque_and_sized() {
    for kind in ALL_KINDS {
        let palette = ColorPalette::from_kind(kind);
        let expected = if kind == PaletteKind::HlsRainbow { 50 } else { 255 };
        assert_eq!(palette.len(), expected, "{:?}", kind);
        assert!(palette.colors().iter().all(|c| c.a == 255), "{:?}", kind);
    }
}

#[test]
fn test_palette_ids_round_trip() {
    for kind in ALL_KINDS {
        if let Some(id) = kind.id() {
            assert_eq!(PaletteKind::from_id(id), kind);
        }
    }
}

#[test]
fn test_palette_from_style_json() {
    let style = DrawStyle::from_json(r#"{"palette": "grey_scale"}"#).unwrap();
    let palette = ColorPalette::from_kind(style.palette);
    assert_eq!(palette.get_color(0), Some(Color::rgb(0, 0, 0)));
}

// ============================================================================
// Level colours
// ============================================================================

#[test]
fn test_first_and_last_level_colours() {
    let palette = ColorPalette::from_kind(PaletteKind::Viridis);
    let levels = ContourLevels::uniform(20, 0.0, 100.0);
    let policy = IndexPolicy::default();

    let low = levels.color_for(0.5, &palette, policy).unwrap();
    let high = levels.color_for(100.0, &palette, policy).unwrap();
    // 0.5 is on level 0: floor(0.99 * 255 / 20) = 12
    assert_eq!(Some(low), palette.get_color(12));
    assert_eq!(Some(high), palette.get_color(254));
    assert_eq!(levels.color_for(-1.0, &palette, policy), None);
}

#[test]
fn test_color_json_shape() {
    let json = serde_json::to_value(Color::rgb(1, 2, 3)).unwrap();
    assert_eq!(json, serde_json::json!({"r": 1, "g": 2, "b": 3, "a": 255}));
    let back: Color = serde_json::from_value(json).unwrap();
    assert_eq!(back.to_hex(), "#010203");
}
