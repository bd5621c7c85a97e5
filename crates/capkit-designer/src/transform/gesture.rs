//! Pointer-capture state machine for layer gestures.
//!
//! ```text
//! Idle --begin_drag--> Dragging --pointer_up/cancel--> Idle
//! Idle --begin_resize--> Resizing --pointer_up/cancel--> Idle
//! Idle --begin_rotate--> Rotating --pointer_up/cancel--> Idle
//! ```
//!
//! Every move recomputes the layer from the values captured when the gesture
//! began, so rounding never accumulates. The first move that changes the
//! layer records one undo step; later moves are transient. Cancelling keeps
//! the last computed position.

use capkit_core::{Layer, LayerFrame, LayerId, LayerPatch};

use super::math::{
    drag_frame, pointer_angle, resize_frame, rotate_into_local, scale_font, snap_angle,
    ResizeHandle, MAX_FONT_SIZE, MIN_FONT_SIZE, MIN_LAYER_SIZE, ROTATION_SNAP_DEGREES,
};
use crate::layer_store::LayerStore;
use crate::viewport::{CanvasScale, PixelPoint};

/// Tunables for the transform engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSettings {
    /// Keep dragged layers inside `[0, 100 - size]`.
    pub bound_drag_to_canvas: bool,
    /// Rotation snap increment in degrees.
    pub rotation_snap: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
    /// Smallest width/height in percent.
    pub min_layer_size: f64,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            bound_drag_to_canvas: true,
            rotation_snap: ROTATION_SNAP_DEGREES,
            min_font_size: MIN_FONT_SIZE,
            max_font_size: MAX_FONT_SIZE,
            min_layer_size: MIN_LAYER_SIZE,
        }
    }
}

impl TransformSettings {
    /// Replaces non-finite or out-of-range values with the defaults and
    /// orders the font bounds.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        let rotation_snap = positive(self.rotation_snap, defaults.rotation_snap).min(360.0);
        let mut min_font_size = positive(self.min_font_size, defaults.min_font_size);
        let mut max_font_size = positive(self.max_font_size, defaults.max_font_size);
        if min_font_size > max_font_size {
            std::mem::swap(&mut min_font_size, &mut max_font_size);
        }
        let min_layer_size = positive(self.min_layer_size, defaults.min_layer_size).min(100.0);

        Self {
            bound_drag_to_canvas: self.bound_drag_to_canvas,
            rotation_snap,
            min_font_size,
            max_font_size,
            min_layer_size,
        }
    }
}

/// Modifier keys held during a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Snap rotation to the configured increment.
    pub snap: bool,
}

impl Modifiers {
    pub fn snapping() -> Self {
        Self { snap: true }
    }
}

/// Layer values captured when a gesture starts.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureOrigin {
    pub layer_id: LayerId,
    pub pointer: PixelPoint,
    pub frame: LayerFrame,
    pub rotation: f64,
    pub font_size: Option<f64>,
    pub lock_aspect: bool,
    checkpointed: bool,
}

impl GestureOrigin {
    fn capture(layer: &Layer, pointer: PixelPoint) -> Self {
        Self {
            layer_id: layer.id.clone(),
            pointer,
            frame: layer.frame(),
            rotation: layer.rotation,
            font_size: layer.text().map(|t| t.font_size),
            lock_aspect: layer.is_image(),
            checkpointed: false,
        }
    }
}

/// Current pointer capture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(GestureOrigin),
    Resizing {
        origin: GestureOrigin,
        handle: ResizeHandle,
    },
    Rotating(GestureOrigin),
}

impl GestureState {
    fn origin_mut(&mut self) -> Option<&mut GestureOrigin> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(origin) | GestureState::Rotating(origin) => Some(origin),
            GestureState::Resizing { origin, .. } => Some(origin),
        }
    }

    fn origin(&self) -> Option<&GestureOrigin> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging(origin) | GestureState::Rotating(origin) => Some(origin),
            GestureState::Resizing { origin, .. } => Some(origin),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging(_) => "dragging",
            GestureState::Resizing { .. } => "resizing",
            GestureState::Rotating(_) => "rotating",
        }
    }
}

/// Drives drag, resize and rotate gestures against a [`LayerStore`].
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    settings: TransformSettings,
    state: GestureState,
}

impl TransformEngine {
    pub fn new(settings: TransformSettings) -> Self {
        let sanitized = settings.clone().sanitized();
        if sanitized != settings {
            tracing::warn!("Transform settings adjusted to {:?}", sanitized);
        }
        Self {
            settings: sanitized,
            state: GestureState::Idle,
        }
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Layer captured by the current gesture.
    pub fn active_layer(&self) -> Option<&LayerId> {
        self.state.origin().map(|o| &o.layer_id)
    }

    /// Starts moving a layer of the active color. Selects it.
    pub fn begin_drag(
        &mut self,
        store: &mut LayerStore,
        id: &LayerId,
        pointer: PixelPoint,
    ) -> bool {
        self.begin(store, id, pointer, GestureState::Dragging)
    }

    /// Starts resizing a layer from one of its handles. Selects it.
    pub fn begin_resize(
        &mut self,
        store: &mut LayerStore,
        id: &LayerId,
        handle: ResizeHandle,
        pointer: PixelPoint,
    ) -> bool {
        self.begin(store, id, pointer, |origin| GestureState::Resizing {
            origin,
            handle,
        })
    }

    /// Starts free rotation of a layer about its center. Selects it.
    pub fn begin_rotate(
        &mut self,
        store: &mut LayerStore,
        id: &LayerId,
        pointer: PixelPoint,
    ) -> bool {
        self.begin(store, id, pointer, GestureState::Rotating)
    }

    fn begin<F>(
        &mut self,
        store: &mut LayerStore,
        id: &LayerId,
        pointer: PixelPoint,
        state: F,
    ) -> bool
    where
        F: FnOnce(GestureOrigin) -> GestureState,
    {
        if self.is_active() {
            tracing::debug!("Gesture already {}, ignoring new capture", self.state.name());
            return false;
        }
        let Some(layer) = store.layer(id) else {
            tracing::debug!("Cannot capture unknown layer {}", id);
            return false;
        };

        let origin = GestureOrigin::capture(layer, pointer);
        store.select_layer(Some(id));
        self.state = state(origin);
        tracing::debug!("Gesture {} started on {}", self.state.name(), id);
        true
    }

    /// Applies a pointer move to the captured layer.
    ///
    /// Returns `true` when the layer changed.
    pub fn pointer_move(
        &mut self,
        store: &mut LayerStore,
        scale: &CanvasScale,
        pointer: PixelPoint,
        modifiers: Modifiers,
    ) -> bool {
        let Some(layer_id) = self.active_layer().cloned() else {
            return false;
        };
        let Some(layer) = store.layer(&layer_id) else {
            tracing::debug!("Layer {} vanished mid-gesture", layer_id);
            self.state = GestureState::Idle;
            return false;
        };
        let Some(patch) = self.compute_patch(layer, scale, pointer, modifiers) else {
            return false;
        };
        let mut probe = layer.clone();
        if !probe.apply(&patch) {
            return false;
        }

        if let Some(origin) = self.state.origin_mut() {
            if !origin.checkpointed {
                store.checkpoint();
                origin.checkpointed = true;
            }
        }
        store.update_layer_transient(&layer_id, &patch)
    }

    /// Releases the pointer. Returns `true` if a gesture was active.
    pub fn pointer_up(&mut self) -> bool {
        self.finish("finished")
    }

    /// Aborts the gesture, keeping the last computed position.
    pub fn cancel(&mut self) -> bool {
        self.finish("cancelled")
    }

    fn finish(&mut self, how: &str) -> bool {
        let previous = std::mem::take(&mut self.state);
        match previous.origin() {
            Some(origin) => {
                tracing::debug!("Gesture {} {} on {}", previous.name(), how, origin.layer_id);
                true
            }
            None => false,
        }
    }

    fn compute_patch(
        &self,
        layer: &Layer,
        scale: &CanvasScale,
        pointer: PixelPoint,
        modifiers: Modifiers,
    ) -> Option<LayerPatch> {
        if !scale.is_measured() {
            return None;
        }
        let settings = &self.settings;

        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging(origin) => {
                let (dx, dy) = origin.local_delta(scale, pointer);
                let frame = drag_frame(origin.frame, dx, dy, settings.bound_drag_to_canvas);
                Some(LayerPatch::position(frame.x, frame.y))
            }
            GestureState::Resizing { origin, handle } => {
                let (dx, dy) = origin.local_delta(scale, pointer);
                let frame = resize_frame(
                    origin.frame,
                    *handle,
                    dx,
                    dy,
                    origin.lock_aspect,
                    settings.min_layer_size,
                );
                let mut patch = LayerPatch::frame(frame);
                if let Some(font_size) = origin.font_size {
                    patch.font_size = Some(scale_font(
                        font_size,
                        origin.frame.width,
                        frame.width,
                        settings.min_font_size,
                        settings.max_font_size,
                    ));
                }
                Some(patch)
            }
            GestureState::Rotating(_) => {
                let center = scale.frame_to_pixels(&layer.frame()).center();
                let mut angle = pointer_angle(center, pointer);
                if modifiers.snap {
                    angle = snap_angle(angle, settings.rotation_snap);
                }
                Some(LayerPatch::rotation(angle))
            }
        }
    }
}

impl GestureOrigin {
    fn local_delta(&self, scale: &CanvasScale, pointer: PixelPoint) -> (f64, f64) {
        let (dx, dy) = pointer.delta_from(self.pointer);
        rotate_into_local(scale.to_percent(dx), scale.to_percent(dy), self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capkit_core::{NewLayer, View};

    fn setup(new_layer: NewLayer) -> (LayerStore, LayerId, CanvasScale) {
        let mut store = LayerStore::new();
        let id = store.add_layer(new_layer);
        (store, id, CanvasScale::new(500.0))
    }

    fn image() -> NewLayer {
        NewLayer::image("logo.png", View::Front)
            .at(30.0, 30.0)
            .sized(40.0, 30.0)
    }

    #[test]
    fn test_drag_moves_by_percent() {
        let (mut store, id, scale) = setup(image());
        let mut engine = TransformEngine::default();

        assert!(engine.begin_drag(&mut store, &id, PixelPoint::new(200.0, 200.0)));
        assert!(engine.pointer_move(
            &mut store,
            &scale,
            PixelPoint::new(250.0, 225.0),
            Modifiers::default()
        ));
        let layer = store.layer(&id).unwrap();
        assert!((layer.x - 40.0).abs() < 1e-9);
        assert!((layer.y - 35.0).abs() < 1e-9);
        assert!(engine.pointer_up());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_drag_of_rotated_layer_uses_local_delta() {
        let (mut store, id, scale) = setup(image().rotated(90.0));
        let mut engine = TransformEngine::new(TransformSettings {
            bound_drag_to_canvas: false,
            ..Default::default()
        });

        engine.begin_drag(&mut store, &id, PixelPoint::new(0.0, 0.0));
        // 50px on a 500px canvas is 10%
        engine.pointer_move(&mut store, &scale, PixelPoint::new(50.0, 0.0), Modifiers::default());
        let layer = store.layer(&id).unwrap();
        assert!((layer.x - 30.0).abs() < 1e-9, "x was {}", layer.x);
        assert!((layer.y - 40.0).abs() < 1e-9, "y was {}", layer.y);
    }

    #[test]
    fn test_whole_drag_undoes_in_one_step() {
        let (mut store, id, scale) = setup(image());
        let mut engine = TransformEngine::default();

        engine.begin_drag(&mut store, &id, PixelPoint::new(0.0, 0.0));
        for step in 1..=10 {
            engine.pointer_move(
                &mut store,
                &scale,
                PixelPoint::new(step as f64, 0.0),
                Modifiers::default(),
            );
        }
        engine.pointer_up();
        assert!((store.layer(&id).unwrap().x - 32.0).abs() < 1e-9);

        store.undo();
        assert_eq!(store.layer(&id).unwrap().x, 30.0);
    }

    #[test]
    fn test_image_resize_keeps_ratio() {
        let (mut store, id, scale) = setup(image());
        let mut engine = TransformEngine::default();

        engine.begin_resize(
            &mut store,
            &id,
            ResizeHandle::BottomRight,
            PixelPoint::new(350.0, 300.0),
        );
        engine.pointer_move(&mut store, &scale, PixelPoint::new(400.0, 310.0), Modifiers::default());
        let layer = store.layer(&id).unwrap();
        assert!((layer.width / layer.height - 40.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_resize_scales_font() {
        let text = NewLayer::text("Crew", View::Front)
            .at(10.0, 10.0)
            .sized(20.0, 10.0);
        let (mut store, id, scale) = setup(text);
        let mut engine = TransformEngine::default();

        engine.begin_resize(&mut store, &id, ResizeHandle::Right, PixelPoint::new(150.0, 75.0));
        // +20% width doubles the font
        engine.pointer_move(&mut store, &scale, PixelPoint::new(250.0, 75.0), Modifiers::default());
        let layer = store.layer(&id).unwrap();
        assert!((layer.width - 40.0).abs() < 1e-9);
        assert_eq!(layer.height, 10.0);
        assert!((layer.text().unwrap().font_size - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_with_snap() {
        let (mut store, id, scale) = setup(image());
        let mut engine = TransformEngine::default();
        // center of (30,30,40,30) on 500px is (250, 225)
        engine.begin_rotate(&mut store, &id, PixelPoint::new(250.0, 100.0));

        engine.pointer_move(&mut store, &scale, PixelPoint::new(350.0, 125.0), Modifiers::default());
        let free = store.layer(&id).unwrap().rotation;
        assert!((free - 45.0).abs() < 1e-9, "rotation was {}", free);

        engine.pointer_move(&mut store, &scale, PixelPoint::new(350.0, 130.0), Modifiers::snapping());
        assert_eq!(store.layer(&id).unwrap().rotation, 45.0);
    }

    #[test]
    fn test_cancel_keeps_last_position() {
        let (mut store, id, scale) = setup(image());
        let mut engine = TransformEngine::default();
        engine.begin_drag(&mut store, &id, PixelPoint::new(0.0, 0.0));
        engine.pointer_move(&mut store, &scale, PixelPoint::new(25.0, 0.0), Modifiers::default());
        assert!(engine.cancel());
        assert!((store.layer(&id).unwrap().x - 35.0).abs() < 1e-9);
        assert!(!engine.cancel());
    }

    #[test]
    fn test_vanished_layer_returns_to_idle() {
        let (mut store, id, scale) = setup(image());
        let mut engine = TransformEngine::default();
        engine.begin_drag(&mut store, &id, PixelPoint::new(0.0, 0.0));
        store.remove_layer(&id);

        assert!(!engine.pointer_move(&mut store, &scale, PixelPoint::new(5.0, 5.0), Modifiers::default()));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_capture_rules() {
        let (mut store, id, _) = setup(image());
        let mut engine = TransformEngine::default();
        assert!(!engine.begin_drag(&mut store, &LayerId::from("nope"), PixelPoint::default()));

        store.select_layer(None);
        assert!(engine.begin_drag(&mut store, &id, PixelPoint::default()));
        assert_eq!(store.selected_layer_id(), Some(&id));
        assert!(!engine.begin_rotate(&mut store, &id, PixelPoint::default()));
        assert_eq!(engine.active_layer(), Some(&id));
    }

    fn resize_text_right(engine: &mut TransformEngine) -> f64 {
        let text = NewLayer::text("Crew", View::Front)
            .at(10.0, 10.0)
            .sized(20.0, 10.0);
        let (mut store, id, scale) = setup(text);
        engine.begin_resize(&mut store, &id, ResizeHandle::Right, PixelPoint::new(150.0, 75.0));
        engine.pointer_move(&mut store, &scale, PixelPoint::new(250.0, 75.0), Modifiers::default());
        store.layer(&id).unwrap().text().unwrap().font_size
    }

    #[test]
    fn test_nan_font_bound_falls_back_to_default() {
        let mut engine = TransformEngine::new(TransformSettings {
            min_font_size: f64::NAN,
            max_font_size: f64::INFINITY,
            ..TransformSettings::default()
        });
        assert_eq!(engine.settings().min_font_size, MIN_FONT_SIZE);
        assert_eq!(engine.settings().max_font_size, MAX_FONT_SIZE);

        let font_size = resize_text_right(&mut engine);
        assert!((font_size - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_font_bounds_are_ordered() {
        let mut engine = TransformEngine::new(TransformSettings {
            min_font_size: 30.0,
            max_font_size: 10.0,
            min_layer_size: -5.0,
            rotation_snap: f64::NAN,
            ..TransformSettings::default()
        });
        let settings = engine.settings();
        assert_eq!((settings.min_font_size, settings.max_font_size), (10.0, 30.0));
        assert_eq!(settings.min_layer_size, MIN_LAYER_SIZE);
        assert_eq!(settings.rotation_snap, ROTATION_SNAP_DEGREES);

        // 24 doubled is 48, capped at the ordered maximum
        assert_eq!(resize_text_right(&mut engine), 30.0);
    }

    #[test]
    fn test_unmeasured_canvas_ignores_moves() {
        let (mut store, id, _) = setup(image());
        let mut engine = TransformEngine::default();
        engine.begin_drag(&mut store, &id, PixelPoint::default());
        let unmeasured = CanvasScale::new(0.0);
        assert!(!engine.pointer_move(&mut store, &unmeasured, PixelPoint::new(9.0, 9.0), Modifiers::default()));
        assert!(engine.is_active());
    }
}
