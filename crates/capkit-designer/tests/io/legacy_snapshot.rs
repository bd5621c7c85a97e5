use capkit_designer::{load_layers_from_file, LayerStore, View};
use tempfile::tempdir;

const LEGACY: &str = r##"[
  {"id": "a", "type": "image", "content": "https://cdn.example.com/a.png",
   "x": 30, "y": 30, "width": 40, "height": 30, "view": "front"},
  {"id": "b", "kind": "text", "content": "Crew", "x": 10, "y": 80,
   "width": 30, "height": 8, "rotation": -90, "flipX": true,
   "view": "back", "color": "#2E2F38"}
]"##;

#[test]
fn test_loads_legacy_layer_array() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, LEGACY).unwrap();

    let layers = load_layers_from_file(&path).unwrap();
    assert_eq!(layers.len(), 2);

    let image = &layers[0];
    assert!(image.is_image());
    assert_eq!(image.rotation, 0.0);
    assert!(!image.flip_x && !image.flip_y);

    let text = &layers[1];
    assert_eq!(text.view, View::Back);
    assert_eq!(text.rotation, 270.0);
    assert!(text.flip_x);
    assert_eq!(text.text().unwrap().font_size, 24.0);
    assert_eq!(text.text().unwrap().color.as_deref(), Some("#2E2F38"));
}

#[test]
fn test_loaded_layers_become_editable_color_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, LEGACY).unwrap();

    let mut store = LayerStore::new();
    store.set_layers_for_color("red", load_layers_from_file(&path).unwrap());
    assert_eq!(store.selected_color(), "red");
    assert_eq!(store.current_layers().len(), 2);
    assert!(store.undo());
    assert!(!store.has_design_for_color("red"));
}

#[test]
fn test_missing_file_reports_context() {
    let dir = tempdir().unwrap();
    let err = load_layers_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read layer file"));
}
