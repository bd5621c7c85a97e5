//! Percent/pixel coordinate mapping for the square canvas.
//!
//! Layers store geometry as percentages of the canvas side. The host measures
//! the rendered canvas and reports its size whenever the container resizes;
//! every conversion uses the latest measurement.

use std::fmt;

use capkit_core::LayerFrame;

/// A point in canvas pixels, origin at the top-left, +Y down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to this point.
    pub fn delta_from(&self, origin: PixelPoint) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// An axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Measured square canvas and the conversions that depend on it.
///
/// ```text
/// to_pixel(p)    = p / 100 * size
/// to_percent(px) = px / size * 100
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasScale {
    size: f64,
}

impl CanvasScale {
    /// Creates a scale for a canvas `size` pixels on each side.
    pub fn new(size: f64) -> Self {
        Self {
            size: sanitize(size),
        }
    }

    /// Current side length in pixels; `0` until the first measurement.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Whether a usable measurement is available.
    pub fn is_measured(&self) -> bool {
        self.size > 0.0
    }

    /// Records a new measurement of the container.
    ///
    /// The canvas is square, so the smaller side wins. Returns `true` when the
    /// scale changed and a repaint is needed.
    pub fn observe(&mut self, width: f64, height: f64) -> bool {
        let size = sanitize(width.min(height));
        if (size - self.size).abs() > f64::EPSILON {
            tracing::debug!("Canvas size {} -> {}", self.size, size);
            self.size = size;
            true
        } else {
            false
        }
    }

    /// Percent to pixels.
    pub fn to_pixel(&self, percent: f64) -> f64 {
        percent / 100.0 * self.size
    }

    /// Pixels to percent; `0` while the canvas is unmeasured.
    pub fn to_percent(&self, pixel: f64) -> f64 {
        if self.size > 0.0 {
            pixel / self.size * 100.0
        } else {
            0.0
        }
    }

    /// Converts a percent-space frame to pixels.
    pub fn frame_to_pixels(&self, frame: &LayerFrame) -> PixelRect {
        PixelRect::new(
            self.to_pixel(frame.x),
            self.to_pixel(frame.y),
            self.to_pixel(frame.width),
            self.to_pixel(frame.height),
        )
    }

    /// Converts a pixel rectangle back to a percent-space frame.
    pub fn pixels_to_frame(&self, rect: &PixelRect) -> LayerFrame {
        LayerFrame::new(
            self.to_percent(rect.x),
            self.to_percent(rect.y),
            self.to_percent(rect.width),
            self.to_percent(rect.height),
        )
    }
}

fn sanitize(size: f64) -> f64 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        0.0
    }
}

impl Default for CanvasScale {
    fn default() -> Self {
        Self::new(500.0)
    }
}

impl fmt::Display for CanvasScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Canvas: {:.1}px", self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let scale = CanvasScale::new(400.0);
        assert_eq!(scale.to_pixel(25.0), 100.0);
        assert_eq!(scale.to_percent(100.0), 25.0);
    }

    #[test]
    fn test_observe_uses_smaller_side() {
        let mut scale = CanvasScale::new(0.0);
        assert!(!scale.is_measured());
        assert_eq!(scale.to_percent(10.0), 0.0);

        assert!(scale.observe(640.0, 480.0));
        assert_eq!(scale.size(), 480.0);
        assert!(!scale.observe(480.0, 900.0));
    }

    #[test]
    fn test_invalid_measurements_reset_to_unmeasured() {
        let mut scale = CanvasScale::new(300.0);
        assert!(scale.observe(-5.0, 200.0));
        assert!(!scale.is_measured());
    }

    #[test]
    fn test_frame_round_trip() {
        let scale = CanvasScale::new(360.0);
        let frame = LayerFrame::new(30.0, 30.0, 40.0, 30.0);
        let rect = scale.frame_to_pixels(&frame);
        assert_eq!(rect, PixelRect::new(108.0, 108.0, 144.0, 108.0));
        let back = scale.pixels_to_frame(&rect);
        assert!((back.x - frame.x).abs() < 1e-9);
        assert!((back.height - frame.height).abs() < 1e-9);
    }
}
