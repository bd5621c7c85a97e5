use capkit_designer::transform::{resize_frame, ResizeHandle};
use capkit_designer::{
    CanvasScale, GestureState, LayerFrame, LayerStore, Modifiers, NewLayer, PixelPoint,
    TransformEngine, TransformSettings, View,
};

const EPS: f64 = 1e-6;

fn setup() -> (LayerStore, capkit_designer::LayerId, CanvasScale) {
    let mut store = LayerStore::new();
    let id = store.add_layer(
        NewLayer::image("logo.png", View::Front)
            .at(30.0, 30.0)
            .sized(40.0, 30.0),
    );
    (store, id, CanvasScale::new(500.0))
}

#[test]
fn test_rotated_drag_follows_layer_axes() {
    let (mut store, id, scale) = setup();
    store.rotate_layer(&id, 90.0);

    let mut engine = TransformEngine::default();
    assert!(engine.begin_drag(&mut store, &id, PixelPoint::new(250.0, 225.0)));
    // (10, 0) percent on screen
    engine.pointer_move(&mut store, &scale, PixelPoint::new(300.0, 225.0), Modifiers::default());
    engine.pointer_up();

    let layer = store.layer(&id).unwrap();
    assert!((layer.x - 30.0).abs() < EPS, "x was {}", layer.x);
    assert!((layer.y - 40.0).abs() < EPS, "y was {}", layer.y);
}

#[test]
fn test_drag_is_bounded_by_default() {
    let (mut store, id, scale) = setup();
    let mut engine = TransformEngine::default();
    engine.begin_drag(&mut store, &id, PixelPoint::new(250.0, 225.0));
    engine.pointer_move(&mut store, &scale, PixelPoint::new(900.0, -400.0), Modifiers::default());
    engine.pointer_up();

    let layer = store.layer(&id).unwrap();
    assert!((layer.x - 60.0).abs() < EPS);
    assert!(layer.y.abs() < EPS);
}

#[test]
fn test_unbounded_drag() {
    let (mut store, id, scale) = setup();
    let mut engine = TransformEngine::new(TransformSettings {
        bound_drag_to_canvas: false,
        ..TransformSettings::default()
    });
    engine.begin_drag(&mut store, &id, PixelPoint::new(250.0, 225.0));
    engine.pointer_move(&mut store, &scale, PixelPoint::new(600.0, 225.0), Modifiers::default());
    assert!((store.layer(&id).unwrap().x - 100.0).abs() < EPS);
}

#[test]
fn test_text_resize_is_free_and_rescales_font() {
    let mut store = LayerStore::new();
    let id = store.add_layer(
        NewLayer::text("Crew", View::Front)
            .at(20.0, 20.0)
            .sized(20.0, 10.0),
    );
    let scale = CanvasScale::new(500.0);
    let mut engine = TransformEngine::default();

    // Right edge handle of the text box
    engine.begin_resize(&mut store, &id, ResizeHandle::Right, PixelPoint::new(200.0, 125.0));
    engine.pointer_move(&mut store, &scale, PixelPoint::new(300.0, 125.0), Modifiers::default());
    engine.pointer_up();

    let layer = store.layer(&id).unwrap();
    assert!((layer.width - 40.0).abs() < EPS);
    assert!((layer.height - 10.0).abs() < EPS);
    assert!((layer.text().unwrap().font_size - 48.0).abs() < EPS);
}

#[test]
fn test_font_clamps_at_upper_bound() {
    let mut store = LayerStore::new();
    let id = store.add_layer(
        NewLayer::text("Big", View::Front)
            .at(0.0, 0.0)
            .sized(10.0, 10.0)
            .styled(None, Some(100.0), None),
    );
    let scale = CanvasScale::new(500.0);
    let mut engine = TransformEngine::default();
    engine.begin_resize(&mut store, &id, ResizeHandle::Right, PixelPoint::new(50.0, 25.0));
    engine.pointer_move(&mut store, &scale, PixelPoint::new(150.0, 25.0), Modifiers::default());

    let size = store.layer(&id).unwrap().text().unwrap().font_size;
    assert_eq!(size, 120.0);
}

#[test]
fn test_top_left_resize_moves_position() {
    let start = LayerFrame::new(30.0, 30.0, 40.0, 30.0);
    let frame = resize_frame(start, ResizeHandle::TopLeft, -8.0, -6.0, true, 1.0);
    assert!((frame.width - 48.0).abs() < EPS);
    assert!((frame.height - 36.0).abs() < EPS);
    assert!((frame.x - 22.0).abs() < EPS);
    assert!((frame.y - 24.0).abs() < EPS);
}

#[test]
fn test_snapped_rotation() {
    let (mut store, id, scale) = setup();
    let mut engine = TransformEngine::default();
    // Rotate handle sits above the layer centre (250, 225)
    engine.begin_rotate(&mut store, &id, PixelPoint::new(250.0, 100.0));
    engine.pointer_move(&mut store, &scale, PixelPoint::new(360.0, 110.0), Modifiers::snapping());
    engine.pointer_up();

    let rotation = store.layer(&id).unwrap().rotation;
    assert_eq!(rotation % 15.0, 0.0);
    assert_eq!(rotation, 45.0);
}

#[test]
fn test_gesture_state_transitions() {
    let (mut store, id, scale) = setup();
    let mut engine = TransformEngine::default();
    assert_eq!(engine.state(), &GestureState::Idle);

    engine.begin_drag(&mut store, &id, PixelPoint::new(250.0, 225.0));
    assert_eq!(engine.state().name(), "dragging");
    // A second press while captured is refused
    assert!(!engine.begin_rotate(&mut store, &id, PixelPoint::new(0.0, 0.0)));

    engine.pointer_move(&mut store, &scale, PixelPoint::new(260.0, 225.0), Modifiers::default());
    assert!(engine.cancel());
    assert!(!engine.is_active());
    // Aborted gesture keeps the last computed position
    assert!((store.layer(&id).unwrap().x - 32.0).abs() < EPS);
}
