//! Pure geometry for drag, resize and rotate gestures.
//!
//! All frames are in percent space. Screen deltas are rotated into the
//! layer's own frame before they are applied:
//!
//! ```text
//! local_dx = dx cos t - dy sin t
//! local_dy = dx sin t + dy cos t
//! ```

use capkit_core::{normalize_rotation, LayerFrame};

use crate::viewport::PixelPoint;

/// Increment used when rotation snapping is held.
pub const ROTATION_SNAP_DEGREES: f64 = 15.0;

/// Smallest font size a text resize may produce.
pub const MIN_FONT_SIZE: f64 = 8.0;

/// Largest font size a text resize may produce.
pub const MAX_FONT_SIZE: f64 = 120.0;

/// Smallest width/height (percent) a resize may produce.
pub const MIN_LAYER_SIZE: f64 = 1.0;

/// Rotate a screen delta into the frame of a layer rotated by `rotation` degrees.
pub fn rotate_into_local(dx: f64, dy: f64, rotation: f64) -> (f64, f64) {
    if rotation == 0.0 {
        return (dx, dy);
    }
    let (sin, cos) = rotation.to_radians().sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Angle of `pointer` around `center`, with straight up as 0 degrees.
pub fn pointer_angle(center: PixelPoint, pointer: PixelPoint) -> f64 {
    let (dx, dy) = pointer.delta_from(center);
    normalize_rotation(dy.atan2(dx).to_degrees() + 90.0)
}

/// Round an angle to the nearest multiple of `increment`, normalized.
pub fn snap_angle(angle: f64, increment: f64) -> f64 {
    if increment <= 0.0 || !increment.is_finite() {
        return normalize_rotation(angle);
    }
    normalize_rotation((angle / increment).round() * increment)
}

/// Scale a font size by the width ratio of a resize, clamped to `[min, max]`.
///
/// Inverted bounds are swapped and non-finite bounds are ignored.
pub fn scale_font(font_size: f64, old_width: f64, new_width: f64, min: f64, max: f64) -> f64 {
    let mut scaled = if old_width > 0.0 && new_width.is_finite() {
        font_size * new_width / old_width
    } else {
        font_size
    };
    let (lo, hi) = if max < min { (max, min) } else { (min, max) };
    if lo.is_finite() {
        scaled = scaled.max(lo);
    }
    if hi.is_finite() {
        scaled = scaled.min(hi);
    }
    scaled
}

/// Move a frame by a percent delta, optionally keeping it inside the canvas.
pub fn drag_frame(start: LayerFrame, dx: f64, dy: f64, bounded: bool) -> LayerFrame {
    let mut x = start.x + dx;
    let mut y = start.y + dy;
    if bounded {
        x = x.clamp(0.0, (100.0 - start.width).max(0.0));
        y = y.clamp(0.0, (100.0 - start.height).max(0.0));
    }
    LayerFrame::new(x, y, start.width, start.height)
}

/// One of the eight resize handles around a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Right,
        ResizeHandle::BottomRight,
        ResizeHandle::Bottom,
        ResizeHandle::BottomLeft,
        ResizeHandle::Left,
    ];

    /// Handle location as a fraction of the layer box, `(0,0)` top-left.
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            ResizeHandle::TopLeft => (0.0, 0.0),
            ResizeHandle::Top => (0.5, 0.0),
            ResizeHandle::TopRight => (1.0, 0.0),
            ResizeHandle::Right => (1.0, 0.5),
            ResizeHandle::BottomRight => (1.0, 1.0),
            ResizeHandle::Bottom => (0.5, 1.0),
            ResizeHandle::BottomLeft => (0.0, 1.0),
            ResizeHandle::Left => (0.0, 0.5),
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft
                | ResizeHandle::TopRight
                | ResizeHandle::BottomRight
                | ResizeHandle::BottomLeft
        )
    }

    fn moves_left_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft
        )
    }

    fn moves_right_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight
        )
    }

    fn moves_top_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight
        )
    }

    fn moves_bottom_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight
        )
    }
}

/// Resize `start` by a layer-local percent delta applied at `handle`.
///
/// The edges opposite the handle stay put. With `lock_aspect` the original
/// width:height ratio is kept; the axis that moved further decides the
/// scale. Neither side shrinks below `min_size`.
pub fn resize_frame(
    start: LayerFrame,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    lock_aspect: bool,
    min_size: f64,
) -> LayerFrame {
    let min_size = min_size.max(f64::EPSILON);

    let mut width = start.width;
    let mut height = start.height;
    if handle.moves_right_edge() {
        width += dx;
    } else if handle.moves_left_edge() {
        width -= dx;
    }
    if handle.moves_bottom_edge() {
        height += dy;
    } else if handle.moves_top_edge() {
        height -= dy;
    }

    if lock_aspect && start.width > 0.0 && start.height > 0.0 {
        let sx = width / start.width;
        let sy = height / start.height;
        let horizontal = handle.moves_left_edge() || handle.moves_right_edge();
        let vertical = handle.moves_top_edge() || handle.moves_bottom_edge();
        let scale = match (horizontal, vertical) {
            (true, false) => sx,
            (false, true) => sy,
            _ => {
                if (sx - 1.0).abs() >= (sy - 1.0).abs() {
                    sx
                } else {
                    sy
                }
            }
        };
        let min_scale = min_size / start.width.min(start.height);
        let scale = scale.max(min_scale);
        width = start.width * scale;
        height = start.height * scale;
    } else {
        width = width.max(min_size);
        height = height.max(min_size);
    }

    let x = if handle.moves_left_edge() {
        start.x + start.width - width
    } else {
        start.x
    };
    let y = if handle.moves_top_edge() {
        start.y + start.height - height
    } else {
        start.y
    };

    LayerFrame::new(x, y, width, height)
}
