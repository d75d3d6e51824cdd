//! Tests for contour level sets and the value-to-colour index.

use contour::{ColorPalette, ContourLevels, IndexPolicy, LevelCache, LevelKey, ZRange};
use plot_common::{DrawStyle, GridStats};
use test_utils::assert_approx_eq;
use test_utils::fixtures::levels as fixture_levels;

fn sweep(min: f64, max: f64, steps: usize) -> impl Iterator<Item = f64> {
    (0..=steps).map(move |k| min + (max - min) * k as f64 / steps as f64)
}

// ============================================================================
// Level monotonicity
// ============================================================================

#[test]
fn test_uniform_levels_strictly_increasing() {
    let cases = [
        (1, 0.0, 1.0),
        (3, 0.0, 6.0),
        (20, -5.0, 5.0),
        (7, 1e-6, 3e-6),
        (50, 900.0, 1100.0),
    ];
    for (count, min, max) in cases {
        let levels = ContourLevels::uniform(count, min, max);
        let values = levels.levels();
        assert_eq!(values.len(), count + 1, "count {}", count);
        assert_eq!(values[0], min);
        assert_eq!(values[count], max);
        assert!(values.windows(2).all(|w| w[0] < w[1]), "{:?}", values);
    }

    // steps below the float resolution of the bounds
    let narrow = [
        (1000, 1e16, 1e16 + 4.0),
        (100, -1e17, -1e17 + 16.0),
        (10, 1e300, 1e300 * (1.0 + 1e-15)),
    ];
    for (count, min, max) in narrow {
        let levels = ContourLevels::uniform(count, min, max);
        let values = levels.levels();
        assert_eq!(values.len(), count + 1);
        assert!(levels.zmin() <= min && levels.zmax() >= max);
        assert!(
            values.windows(2).all(|w| w[0] < w[1]),
            "collapsed levels for [{}, {}]",
            min,
            max
        );
    }
}

#[test]
fn test_build_widens_flat_range() {
    let style = DrawStyle::default();
    let levels = ContourLevels::build(4, 5.0, 5.0, None, false, &style);
    assert_approx_eq!(levels.zmin(), 4.95, 1e-12);
    assert_approx_eq!(levels.zmax(), 5.05, 1e-12);
    assert!(levels.levels().windows(2).all(|w| w[0] < w[1]));

    let levels = ContourLevels::build(4, 0.0, 0.0, None, false, &style);
    assert_eq!(levels.zmin(), -0.01);
    assert_eq!(levels.zmax(), 0.01);
}

#[test]
fn test_build_uses_style_count() {
    let style = DrawStyle {
        number_contours: 8,
        ..DrawStyle::default()
    };
    let levels = ContourLevels::build(0, 0.0, 1.0, None, false, &style);
    assert_eq!(levels.len(), 9);
}

#[test]
fn test_log_levels_span_decades() {
    let levels = ContourLevels::logarithmic(4, 1.0, 10000.0, None);
    let expected = [1.0, 10.0, 100.0, 1000.0, 10000.0];
    for (got, want) in levels.levels().iter().zip(expected) {
        assert_approx_eq!(*got, want, want * 1e-9);
    }
    assert!(levels.is_custom());
}

#[test]
fn test_log_levels_without_positive_minimum() {
    let style = DrawStyle::default();
    let levels = ContourLevels::build(4, -3.0, 100.0, None, true, &style);
    assert_approx_eq!(levels.zmin(), 0.01, 1e-12);
    assert_eq!(levels.zmax(), 100.0);
}

// ============================================================================
// Concrete scenario and boundaries
// ============================================================================

#[test]
fn test_diagonal_scenario_levels() {
    let style = DrawStyle::default();
    let levels = ContourLevels::build(3, 0.0, 6.0, None, false, &style);
    assert_eq!(levels.levels(), &[0.0, 2.0, 4.0, 6.0]);
    assert_eq!(levels.index_for(3.0, IndexPolicy::default()), Some(1));
}

#[test]
fn test_index_boundaries() {
    let policy = IndexPolicy::default();

    let zero_based = ContourLevels::uniform(10, 0.0, 10.0);
    assert_eq!(zero_based.index_for(-1e-9, policy), None);
    assert_eq!(zero_based.index_for(0.0, policy), None);
    assert_eq!(zero_based.index_for(10.0, policy), Some(10));
    assert_eq!(zero_based.index_for(1e6, policy), Some(10));

    let shifted = ContourLevels::uniform(10, 1.0, 11.0);
    assert_eq!(shifted.index_for(1.0 - 1e-9, policy), None);
    assert_eq!(shifted.index_for(1.0, policy), Some(0));
    assert_eq!(shifted.index_for(11.0, policy), Some(10));
}

#[test]
fn test_index_zero_truth_table() {
    let levels = ContourLevels::uniform(4, 0.0, 8.0);
    let cases = [
        (false, false, None),
        (true, false, Some(0)),
        (false, true, Some(0)),
        (true, true, Some(0)),
    ];
    for (draw_zero, poly_grid, expected) in cases {
        let policy = IndexPolicy {
            draw_zero,
            poly_grid,
        };
        assert_eq!(levels.index_for(0.0, policy), expected, "{:?}", policy);
    }

    // below the minimum only col0 helps
    let col0 = IndexPolicy {
        draw_zero: true,
        poly_grid: false,
    };
    let poly = IndexPolicy {
        draw_zero: false,
        poly_grid: true,
    };
    assert_eq!(levels.index_for(-1.0, col0), Some(0));
    assert_eq!(levels.index_for(-1.0, poly), None);
}

#[test]
fn test_nan_has_no_index() {
    let levels = ContourLevels::uniform(4, 0.0, 8.0);
    assert_eq!(levels.index_for(f64::NAN, IndexPolicy::default()), None);
    let user = ContourLevels::user(&fixture_levels::USER, 0.0, 9.0).unwrap();
    assert_eq!(user.index_for(f64::NAN, IndexPolicy::default()), None);
}

// ============================================================================
// Index monotonicity
// ============================================================================

#[test]
fn test_index_monotonic_uniform() {
    let levels = ContourLevels::uniform(7, -3.0, 11.0);
    let policy = IndexPolicy::default();
    let mut last = None;
    for v in sweep(-3.0, 11.0, 2000) {
        let index = levels.index_for(v, policy);
        assert!(index >= last, "index dropped at {}", v);
        last = index;
    }
    assert_eq!(last, Some(7));
}

#[test]
fn test_index_monotonic_custom() {
    let levels = ContourLevels::logarithmic(6, 0.5, 5000.0, None);
    let policy = IndexPolicy::default();
    let mut last = None;
    for v in sweep(0.5, 5000.0, 5000) {
        let index = levels.index_for(v, policy);
        assert!(index.is_some());
        assert!(index >= last, "index dropped at {}", v);
        last = index;
    }
}

#[test]
fn test_colour_index_monotonic() {
    let levels = ContourLevels::uniform(20, 0.0, 1.0);
    let palette = ColorPalette::default();
    let policy = IndexPolicy::default();
    let indices: Vec<usize> = sweep(0.001, 1.0, 500)
        .filter_map(|v| levels.color_index_for(v, &palette, policy))
        .collect();
    assert_eq!(indices.len(), 501);
    assert!(indices.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(indices.last().copied(), Some(palette.len() - 1));
}

// ============================================================================
// User levels
// ============================================================================

#[test]
fn test_user_levels_passthrough() {
    let levels = ContourLevels::user(&[1.0, 5.0, 9.0], 1.0, 9.0).unwrap();
    assert_eq!(levels.levels(), &[1.0, 5.0, 9.0]);
    assert!(levels.is_custom());

    let extended = ContourLevels::user(&[1.0, 5.0, 9.0], 0.0, 12.0).unwrap();
    assert_eq!(extended.levels(), &[1.0, 5.0, 9.0, 12.0]);
}

#[test]
fn test_user_levels_index() {
    let levels = ContourLevels::user(&fixture_levels::USER, 0.0, 9.0).unwrap();
    let policy = IndexPolicy::default();
    assert_eq!(levels.index_for(0.4, policy), None);
    assert_eq!(levels.index_for(0.5, policy), Some(0));
    assert_eq!(levels.index_for(2.2, policy), Some(1));
    assert_eq!(levels.index_for(2.5, policy), Some(2));
    assert_eq!(levels.index_for(20.0, policy), Some(3));
}

// ============================================================================
// Level cache
// ============================================================================

#[test]
fn test_cache_rebuilds_on_key_change() {
    let style = DrawStyle::default();
    let mut cache = LevelCache::new();
    let range = ZRange::new(0.0, 10.0, None);

    cache.get_or_build(LevelKey::new(5, range, false), &style);
    cache.get_or_build(LevelKey::new(5, range, false), &style);
    assert_eq!(cache.builds(), 1);

    let levels = cache.get_or_build(LevelKey::new(5, range, true), &style);
    assert!(levels.is_custom());
    assert_eq!(cache.builds(), 2);

    cache.invalidate();
    assert!(cache.current().is_none());
    cache.get_or_build(LevelKey::new(5, range, true), &style);
    assert_eq!(cache.builds(), 3);
}

#[test]
fn test_cache_user_levels_never_recomputed() {
    let style = DrawStyle::default();
    let mut cache = LevelCache::new();
    let key = LevelKey::new(20, ZRange::new(0.0, 9.0, None), false)
        .with_user_levels(vec![1.0, 5.0, 9.0]);
    let levels = cache.get_or_build(key, &style);
    assert_eq!(levels.levels(), &[1.0, 5.0, 9.0]);
}

#[test]
fn test_zrange_falls_back_to_global() {
    let flat = GridStats {
        min: 3.0,
        max: 3.0,
        min_positive: Some(3.0),
        sum: 12.0,
    };
    let global = GridStats {
        min: -1.0,
        max: 8.0,
        min_positive: Some(0.5),
        sum: 40.0,
    };
    let range = ZRange::select(Some(&flat), Some(&global), None, None);
    assert_eq!((range.min, range.max), (-1.0, 8.0));
    assert_eq!(range.min_positive, Some(0.5));

    let range = ZRange::select(Some(&flat), Some(&global), Some((0.0, 5.0)), Some((1.0, 2.0)));
    assert_eq!((range.min, range.max), (1.0, 2.0));
}
