use std::sync::Arc;

use capkit_core::ProductCatalog;
use capkit_designer::{
    CanvasRenderer, DesignCanvas, DrawCommand, HitTarget, LayerStore, Modifiers, NewLayer,
    PixelPoint, PointerOutcome, RenderMode, RenderOptions, TransformEngine, View,
};

fn editor() -> DesignCanvas {
    DesignCanvas::new(
        Arc::new(ProductCatalog::default_cap()),
        CanvasRenderer::new(RenderOptions::default()),
        TransformEngine::default(),
    )
    .with_initial_size(500.0)
}

#[test]
fn test_gesture_undoes_in_one_step() {
    let mut store = LayerStore::new();
    let id = store.add_layer(
        NewLayer::image("logo.png", View::Front)
            .at(30.0, 30.0)
            .sized(40.0, 30.0),
    );
    let mut canvas = editor();

    canvas.pointer_down(&mut store, PixelPoint::new(250.0, 225.0));
    for step in 1..=5 {
        let x = 250.0 + step as f64 * 10.0;
        canvas.pointer_move(&mut store, PixelPoint::new(x, 225.0), Modifiers::default());
    }
    canvas.pointer_up();
    assert!((store.layer(&id).unwrap().x - 40.0).abs() < 1e-9);

    assert!(store.undo());
    assert_eq!(store.layer(&id).unwrap().x, 30.0);
}

#[test]
fn test_rotate_handle_starts_rotation() {
    let mut store = LayerStore::new();
    let id = store.add_layer(
        NewLayer::image("logo.png", View::Front)
            .at(30.0, 30.0)
            .sized(40.0, 30.0),
    );
    let mut canvas = editor();
    let rotate = canvas.paint(&store).handles().unwrap().rotate;

    assert_eq!(canvas.hit_test(rotate), HitTarget::Rotate(id.clone()));
    let outcome = canvas.pointer_down(&mut store, rotate);
    assert_eq!(outcome, PointerOutcome::Rotating(id.clone()));

    // Pointer directly right of the centre (250, 225)
    canvas.pointer_move(&mut store, PixelPoint::new(400.0, 225.0), Modifiers::default());
    canvas.pointer_up();
    assert!((store.layer(&id).unwrap().rotation - 90.0).abs() < 1e-9);
}

#[test]
fn test_switching_to_read_only_cancels_gesture() {
    let mut store = LayerStore::new();
    store.add_layer(NewLayer::text("Crew", View::Front).at(30.0, 30.0).sized(40.0, 30.0));
    let mut canvas = editor();

    canvas.pointer_down(&mut store, PixelPoint::new(250.0, 225.0));
    assert!(canvas.engine().is_active());
    canvas.set_mode(RenderMode::ReadOnly);
    assert!(!canvas.engine().is_active());
    assert!(canvas.is_read_only());

    let scene = canvas.paint(&store);
    assert!(scene.handles().is_none());
    assert!(scene
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Layer(_))));
}

#[test]
fn test_missing_base_image_still_renders_layers() {
    let mut store = LayerStore::new();
    store.set_selected_color("purple");
    store.add_layer(NewLayer::text("Crew", View::Front).at(30.0, 30.0).sized(40.0, 30.0));

    let mut canvas = editor();
    let scene = canvas.paint(&store);
    assert!(!scene
        .commands
        .iter()
        .any(|c| matches!(c, DrawCommand::BaseImage { .. })));
    assert_eq!(scene.sprites().count(), 1);
}
