//! Integration tests for the coordinate mapper.

use projection::{
    Axis, AxisOptions, CoordinateMapper, MapperError, MapperState, MapperWarning, Projection,
};
use test_utils::assert_approx_eq;

fn linear_mapper(width: f64, height: f64, x: (f64, f64), y: (f64, f64)) -> CoordinateMapper {
    let mut mapper = CoordinateMapper::new(width, height);
    mapper
        .set_range(Axis::X, x.0, x.1, AxisOptions::linear())
        .unwrap();
    mapper
        .set_range(Axis::Y, y.0, y.1, AxisOptions::linear())
        .unwrap();
    mapper
}

// ============================================================================
// Linear axes
// ============================================================================

#[test]
fn test_linear_round_trip() {
    let mut mapper = linear_mapper(500.0, 300.0, (0.0, 100.0), (-1.0, 1.0));
    mapper.prepare().unwrap();

    for x in [0.0, 12.5, 33.3, 50.0, 99.0, 100.0] {
        let px = mapper.to_pixel_x(x).unwrap();
        assert_approx_eq!(mapper.to_data_x(px).unwrap(), x, 1e-9);
    }
    assert_eq!(mapper.to_pixel_x(0.0).unwrap(), 0.0);
    assert_eq!(mapper.to_pixel_x(100.0).unwrap(), 500.0);

    for y in [-1.0, -0.25, 0.0, 0.8] {
        let py = mapper.to_pixel_y(y).unwrap();
        assert_approx_eq!(mapper.to_data_y(py).unwrap(), y, 1e-9);
    }
    assert_eq!(mapper.to_pixel_y(1.0).unwrap(), 0.0);
}

#[test]
fn test_zoom_changes_mapping() {
    let mut mapper = linear_mapper(500.0, 300.0, (0.0, 100.0), (0.0, 1.0));
    assert!(mapper.zoom(Axis::X, 20.0, 40.0));
    mapper.prepare().unwrap();
    assert_eq!(mapper.to_pixel_x(30.0).unwrap(), 250.0);

    assert!(mapper.unzoom(Axis::X));
    mapper.prepare().unwrap();
    assert_eq!(mapper.to_pixel_x(30.0).unwrap(), 150.0);
}

#[test]
fn test_swapped_axes() {
    let mut mapper = linear_mapper(400.0, 200.0, (0.0, 10.0), (0.0, 100.0));
    mapper.set_swapped(true);
    mapper.prepare().unwrap();

    // X data is drawn upwards along the frame height
    assert_eq!(mapper.to_pixel_x(0.0).unwrap(), 200.0);
    assert_eq!(mapper.to_pixel_x(10.0).unwrap(), 0.0);
    // Y data is drawn rightwards along the frame width
    assert_eq!(mapper.to_pixel_y(25.0).unwrap(), 100.0);

    let (h, v) = mapper.to_pixel(5.0, 50.0).unwrap();
    assert_eq!((h, v), (200.0, 100.0));
    assert_approx_eq!(mapper.to_data_x(v).unwrap(), 5.0, 1e-9);
    assert_approx_eq!(mapper.to_data_y(h).unwrap(), 50.0, 1e-9);
}

// ============================================================================
// Logarithmic axes
// ============================================================================

#[test]
fn test_log_axis() {
    let mut mapper = CoordinateMapper::new(300.0, 100.0);
    mapper.set_range(Axis::X, 1.0, 1000.0, AxisOptions::log()).unwrap();
    mapper.set_range(Axis::Y, 0.0, 1.0, AxisOptions::linear()).unwrap();
    mapper.prepare().unwrap();

    assert_approx_eq!(mapper.to_pixel_x(10.0).unwrap(), 100.0, 1e-9);
    assert_approx_eq!(mapper.to_pixel_x(100.0).unwrap(), 200.0, 1e-9);

    let err = mapper.to_pixel_x(0.0).unwrap_err();
    assert_eq!(err, MapperError::NonPositiveLog { axis: Axis::X, value: 0.0 });
}

#[test]
fn test_log_axis_non_positive_minimum() {
    let mut mapper = CoordinateMapper::new(100.0, 100.0);
    mapper.set_range(Axis::X, 0.0, 1.0, AxisOptions::linear()).unwrap();
    mapper.set_range(Axis::Y, -5.0, 100.0, AxisOptions::log()).unwrap();
    mapper.prepare().unwrap();

    assert_eq!(
        mapper.warnings(),
        &[MapperWarning::LogRangeAdjusted { axis: Axis::Y, min: 0.01 }]
    );
    assert_approx_eq!(mapper.scale(Axis::Y).unwrap().min, 0.01, 1e-15);
}

#[test]
fn test_log_adjustment_recorded_once_across_prepares() {
    let mut mapper = CoordinateMapper::new(100.0, 100.0);
    mapper.set_range(Axis::X, 0.0, 1.0, AxisOptions::linear()).unwrap();
    mapper.set_range(Axis::Y, -5.0, 100.0, AxisOptions::log()).unwrap();
    for _ in 0..1000 {
        mapper.prepare().unwrap();
    }
    assert_eq!(mapper.warnings().len(), 1);

    // a different maximum is a new adjustment
    mapper.set_range(Axis::Y, -5.0, 1000.0, AxisOptions::log()).unwrap();
    mapper.prepare().unwrap();
    mapper.prepare().unwrap();
    assert_eq!(mapper.warnings().len(), 2);

    assert_eq!(mapper.take_warnings().len(), 2);
    mapper.prepare().unwrap();
    assert_eq!(
        mapper.warnings(),
        &[MapperWarning::LogRangeAdjusted { axis: Axis::Y, min: 0.1 }]
    );
}

// ============================================================================
// Projections
// ============================================================================

#[test]
fn test_projection_resolves_bounding_box() {
    let mut mapper = linear_mapper(360.0, 180.0, (-180.0, 180.0), (-90.0, 90.0));
    mapper.set_projection(Projection::Sinusoidal);
    assert_eq!(mapper.state(), MapperState::Projected);
    mapper.prepare().unwrap();

    let x = mapper.scale(Axis::X).unwrap();
    assert_approx_eq!(x.min, -180.0, 1e-9);
    assert_approx_eq!(x.max, 180.0, 1e-9);

    // the central meridian is preserved
    let (h, v) = mapper.to_pixel(0.0, 45.0).unwrap();
    assert_approx_eq!(h, 180.0, 1e-9);
    assert_approx_eq!(v, 45.0, 1e-9);

    let window = mapper.original_window().unwrap();
    assert_eq!(window.ymin, -90.0);
}

#[test]
fn test_mercator_pole_disables_projection() {
    let mut mapper = linear_mapper(200.0, 200.0, (-180.0, 180.0), (-95.0, 10.0));
    mapper.set_projection(Projection::Mercator);
    mapper.prepare().unwrap();

    assert_eq!(mapper.projection(), Projection::None);
    assert_eq!(mapper.state(), MapperState::Ready);
    let warnings = mapper.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0],
        MapperWarning::MercatorLatitudeOutOfRange { ymin, ymax } if ymin == -95.0 && ymax == 10.0
    ));
    assert!(mapper.warnings().is_empty());

    // behaves like an unprojected frame afterwards
    assert_eq!(mapper.to_pixel(0.0, 10.0).unwrap(), (100.0, 0.0));
}

#[test]
fn test_mercator_valid_range() {
    let mut mapper = linear_mapper(200.0, 200.0, (-180.0, 180.0), (-60.0, 60.0));
    mapper.set_projection(Projection::Mercator);
    mapper.prepare().unwrap();

    assert_eq!(mapper.projection(), Projection::Mercator);
    assert!(mapper.warnings().is_empty());
    // ln(tan(75 deg)) at the upper edge
    let y = mapper.scale(Axis::Y).unwrap();
    assert_approx_eq!(y.max, 1.3169578969248166, 1e-9);
    assert_approx_eq!(y.min, -1.3169578969248166, 1e-9);
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_not_configured() {
    let mut mapper = CoordinateMapper::new(100.0, 100.0);
    assert!(matches!(mapper.to_pixel(1.0, 1.0), Err(MapperError::NotConfigured(_))));

    mapper.set_range(Axis::X, 0.0, 1.0, AxisOptions::linear()).unwrap();
    assert!(matches!(mapper.prepare(), Err(MapperError::NotConfigured(_))));

    mapper.set_range(Axis::Y, 0.0, 1.0, AxisOptions::linear()).unwrap();
    assert!(matches!(mapper.to_data_y(1.0), Err(MapperError::NotConfigured(_))));
    mapper.prepare().unwrap();
    assert!(mapper.to_data_y(1.0).is_ok());

    mapper.set_frame_size(50.0, 50.0);
    assert_eq!(mapper.state(), MapperState::RangeSet);
}
