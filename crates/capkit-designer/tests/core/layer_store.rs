use std::sync::Arc;

use capkit_core::{AppEvent, DesignEvent, EventBus, EventFilter};
use capkit_designer::{LayerPatch, LayerStore, LayerStoreOptions, NewLayer, View};
use parking_lot::Mutex;

fn logo() -> NewLayer {
    NewLayer::image("https://cdn.example.com/logo.png", View::Front)
        .at(30.0, 30.0)
        .sized(40.0, 30.0)
}

#[test]
fn test_add_layer_defaults() {
    let mut store = LayerStore::new();
    let id = store.add_layer(NewLayer::text("Team", View::Left));
    let layer = store.layer(&id).unwrap();
    assert_eq!(layer.width, 100.0);
    assert_eq!(layer.height, 100.0);
    assert_eq!(layer.rotation, 0.0);
    assert!(!layer.flip_x && !layer.flip_y);
    assert_eq!(store.selected_layer_id(), Some(&id));
}

#[test]
fn test_copy_design_is_independent() {
    let mut store = LayerStore::new();
    store.add_layer(logo().rotated(45.0));
    store.add_layer(NewLayer::text("Crew", View::Back).at(10.0, 20.0));

    let count = store.copy_design_to_color("black", "khaki");
    assert_eq!(count, 2);

    let black = store.snapshot_color("black");
    let khaki = store.snapshot_color("khaki");
    assert_eq!(black.len(), khaki.len());
    for (a, b) in black.iter().zip(&khaki) {
        assert_ne!(a.id, b.id);
        assert_eq!(a.content(), b.content());
        assert_eq!(a.frame(), b.frame());
        assert_eq!(a.view, b.view);
        assert_eq!(a.rotation, b.rotation);
    }

    store.set_selected_color("khaki");
    let first = khaki[0].id.clone();
    assert!(store.update_layer(&first, &LayerPatch::position(70.0, 70.0)));
    store.flip_layer_x(&first);

    assert_eq!(store.snapshot_color("black"), black);
    assert_eq!(store.layers_for_color("khaki")[0].x, 70.0);
}

#[test]
fn test_unknown_ids_are_ignored() {
    let mut store = LayerStore::new();
    let id = store.add_layer(logo());
    let ghost = "missing".into();

    assert!(!store.update_layer(&ghost, &LayerPatch::position(1.0, 1.0)));
    assert!(!store.rotate_layer(&ghost, 90.0));
    assert!(!store.flip_layer_y(&ghost));
    assert!(store.remove_layer(&ghost).is_none());
    store.select_layer(Some(&ghost));

    assert_eq!(store.selected_layer_id(), Some(&id));
    assert_eq!(store.current_layers().len(), 1);
}

#[test]
fn test_switching_color_keeps_other_sets() {
    let mut store = LayerStore::new();
    store.add_layer(logo());
    store.set_selected_color("red");
    assert!(store.selected_layer_id().is_none());
    assert!(store.current_layers().is_empty());
    store.add_layer(NewLayer::text("Red", View::Front));

    assert_eq!(store.colors_with_design(), vec!["black", "red"]);
    store.clear_color_design("red");
    assert!(!store.has_design_for_color("red"));
    assert!(store.has_design_for_color("black"));
}

#[test]
fn test_current_view_filter() {
    let mut store = LayerStore::new();
    store.add_layer(logo());
    store.add_layer(NewLayer::text("Back", View::Back));
    assert_eq!(store.current_view_layers().len(), 1);
    store.set_current_view(View::Back);
    assert_eq!(store.current_view_layers()[0].content(), "Back");
}

#[test]
fn test_undo_redo_round() {
    let mut store = LayerStore::new();
    let id = store.add_layer(logo());
    store.rotate_layer(&id, 30.0);
    store.rotate_layer(&id, 30.0);
    assert_eq!(store.layer(&id).unwrap().rotation, 60.0);

    assert!(store.undo());
    assert_eq!(store.layer(&id).unwrap().rotation, 30.0);
    assert!(store.redo());
    assert_eq!(store.layer(&id).unwrap().rotation, 60.0);

    assert!(store.undo());
    store.flip_layer_x(&id);
    assert!(!store.can_redo());
}

#[test]
fn test_new_session_resets_everything() {
    let options = LayerStoreOptions {
        default_color: "khaki".to_string(),
        default_view: View::Top,
        ..LayerStoreOptions::default()
    };
    let mut store = LayerStore::with_options(options);
    assert_eq!(store.selected_color(), "khaki");

    let old = store.session_id().to_string();
    store.add_layer(logo());
    store.set_selected_color("red");
    store.set_current_view(View::Back);

    let fresh = store.new_session().to_string();
    assert_ne!(fresh, old);
    assert!(fresh.starts_with("session_"));
    assert_eq!(store.selected_color(), "khaki");
    assert_eq!(store.current_view(), View::Top);
    assert!(store.colors_with_design().is_empty());
    assert!(!store.can_undo());
}

#[test]
fn test_events_on_shared_bus() {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(EventFilter::All, move |event: AppEvent| {
        sink.lock().push(event);
    });

    let mut store = LayerStore::new().with_event_bus(Arc::clone(&bus));
    let id = store.add_layer(logo());
    store.remove_layer(&id);

    let seen = seen.lock();
    assert!(seen.contains(&AppEvent::Design(DesignEvent::LayerAdded {
        color: "black".to_string(),
        layer_id: id.clone(),
    })));
    assert!(seen.contains(&AppEvent::Design(DesignEvent::LayerRemoved {
        color: "black".to_string(),
        layer_id: id.clone(),
    })));
    assert_eq!(
        seen.last(),
        Some(&AppEvent::Design(DesignEvent::SelectionChanged { layer_id: None }))
    );
}
