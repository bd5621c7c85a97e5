use std::sync::Arc;

use capkit_core::ProductCatalog;
use capkit_designer::{
    scene_to_svg, CanvasRenderer, DesignCanvas, LayerStore, NewLayer, RenderOptions,
    TransformEngine, View,
};

fn preview() -> DesignCanvas {
    DesignCanvas::new(
        Arc::new(ProductCatalog::default_cap()),
        CanvasRenderer::new(RenderOptions {
            show_view_label: true,
            ..RenderOptions::read_only()
        }),
        TransformEngine::default(),
    )
    .with_initial_size(400.0)
}

#[test]
fn test_read_only_preview_has_no_controls() {
    let mut store = LayerStore::new();
    store.add_layer(
        NewLayer::text("Crew <1>", View::Front)
            .at(25.0, 25.0)
            .sized(50.0, 10.0)
            .rotated(45.0),
    );

    let mut canvas = preview();
    let svg = scene_to_svg(canvas.paint(&store));
    assert!(svg.contains(r#"width="400""#));
    assert!(svg.contains("/assets/hats/black-front.png"));
    assert!(svg.contains("rotate(45)"));
    assert!(svg.contains("Crew &lt;1&gt;"));
    assert!(svg.contains(">FRONT</text>"));
    assert!(!svg.contains("<circle"));
}

#[test]
fn test_right_view_mirrors_shared_side_shot() {
    let store = LayerStore::new();
    let mut canvas = preview();

    let frozen = store.snapshot_color("khaki");
    let svg = scene_to_svg(canvas.paint_layers("khaki", View::Right, &frozen));
    assert!(svg.contains("/assets/hats/khaki-side.png"));
    assert!(svg.contains("scale(-1 1)"));

    let svg = scene_to_svg(canvas.paint_layers("black", View::Right, &frozen));
    assert!(svg.contains("/assets/hats/black-right.png"));
    assert!(!svg.contains("scale(-1 1)"));
}
