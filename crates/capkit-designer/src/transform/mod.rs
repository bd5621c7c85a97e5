//! Drag, resize and rotate gestures.
//!
//! [`math`] holds the pure geometry; [`gesture`] wraps it in the pointer
//! capture state machine that writes into a [`LayerStore`](crate::LayerStore).

pub mod gesture;
pub mod math;

pub use gesture::{GestureOrigin, GestureState, Modifiers, TransformEngine, TransformSettings};
pub use math::{
    drag_frame, pointer_angle, resize_frame, rotate_into_local, scale_font, snap_angle,
    ResizeHandle, MAX_FONT_SIZE, MIN_FONT_SIZE, MIN_LAYER_SIZE, ROTATION_SNAP_DEGREES,
};
