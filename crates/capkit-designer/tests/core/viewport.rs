use capkit_designer::viewport::{CanvasScale, PixelRect};
use capkit_designer::LayerFrame;

#[test]
fn test_scale_uses_smaller_side() {
    let mut scale = CanvasScale::new(0.0);
    assert!(!scale.is_measured());
    assert!(scale.observe(1200.0, 640.0));
    assert_eq!(scale.size(), 640.0);
    // Same measurement again is not a change
    assert!(!scale.observe(700.0, 640.0));
}

#[test]
fn test_percent_to_pixel() {
    let scale = CanvasScale::new(500.0);
    assert!((scale.to_pixel(30.0) - 150.0).abs() < 1e-9);
    assert!((scale.to_percent(250.0) - 50.0).abs() < 1e-9);
}

#[test]
fn test_same_frame_scales_with_canvas() {
    let frame = LayerFrame::new(30.0, 30.0, 40.0, 30.0);
    let small = CanvasScale::new(300.0).frame_to_pixels(&frame);
    let large = CanvasScale::new(900.0).frame_to_pixels(&frame);
    assert_eq!(small, PixelRect::new(90.0, 90.0, 120.0, 90.0));
    assert_eq!(large, PixelRect::new(270.0, 270.0, 360.0, 270.0));
}

#[test]
fn test_unmeasured_canvas_maps_to_zero() {
    let scale = CanvasScale::new(f64::NAN);
    assert_eq!(scale.size(), 0.0);
    assert_eq!(scale.to_percent(120.0), 0.0);
}

#[test]
fn test_frame_round_trip() {
    let scale = CanvasScale::new(437.0);
    let frame = LayerFrame::new(12.5, 80.0, 7.25, 19.0);
    let back = scale.pixels_to_frame(&scale.frame_to_pixels(&frame));
    assert!((back.x - frame.x).abs() < 1e-9);
    assert!((back.y - frame.y).abs() < 1e-9);
    assert!((back.width - frame.width).abs() < 1e-9);
    assert!((back.height - frame.height).abs() < 1e-9);
}
