use capkit_commerce::{AddOutcome, Cart, NewCartLine, Order};
use capkit_core::{LayerPatch, NewLayer, ProductCatalog, View};
use capkit_designer::{LayerStore, LayerStoreOptions};

fn studio_store() -> LayerStore {
    let mut store = LayerStore::new();
    store.add_layer(
        NewLayer::image("logo.png", View::Front)
            .at(30.0, 30.0)
            .sized(40.0, 30.0),
    );
    store.add_layer(
        NewLayer::text("Crew", View::Back)
            .at(35.0, 45.0)
            .styled(Some("#2E2F38".to_string()), Some(24.0), None),
    );
    store
}

#[test]
fn test_same_design_merges_into_one_line() {
    let catalog = ProductCatalog::default_cap();
    let store = studio_store();
    let mut cart = Cart::new();

    let first = cart.add_line(NewCartLine::from_store(&store, &catalog, "M", 2));
    assert!(matches!(first, AddOutcome::Added(_)));

    let second = cart.add_line(NewCartLine::from_store(&store, &catalog, "M", 1));
    assert_eq!(
        second,
        AddOutcome::Merged {
            line_id: first.line_id().unwrap().to_string(),
            quantity: 3
        }
    );
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.lines()[0].color_label, "Midnight Black");
    assert_eq!(cart.lines()[0].design_layers.len(), 2);
}

#[test]
fn test_changed_design_or_size_adds_a_line() {
    let catalog = ProductCatalog::default_cap();
    let mut store = studio_store();
    let mut cart = Cart::new();
    cart.add_line(NewCartLine::from_store(&store, &catalog, "M", 1));

    cart.add_line(NewCartLine::from_store(&store, &catalog, "L", 1));
    assert_eq!(cart.len(), 2);

    let text_id = store.current_layers()[1].id.clone();
    store.update_layer(&text_id, &LayerPatch::default().with_content("Team"));
    cart.add_line(NewCartLine::from_store(&store, &catalog, "M", 1));
    assert_eq!(cart.len(), 3);
}

#[test]
fn test_frozen_designs_are_independent_of_the_session() {
    let catalog = ProductCatalog::default_cap();
    let mut store = studio_store();
    let mut cart = Cart::new();
    let line_id = cart
        .add_line(NewCartLine::from_store(&store, &catalog, "M", 1))
        .line_id()
        .unwrap()
        .to_string();

    let image_id = store.current_layers()[0].id.clone();
    store.update_layer(&image_id, &LayerPatch::position(5.0, 5.0));
    assert_eq!(cart.line(&line_id).unwrap().design_layers[0].x, 30.0);

    let order = Order::place("RH-20241219-001", cart.lines());
    cart.clear();
    assert_eq!(order.items[0].design_snapshot[0].x, 30.0);
    assert_eq!(order.total_quantity(), 1);
}

#[test]
fn test_line_edit_never_touches_live_session() {
    let catalog = ProductCatalog::default_cap();
    let mut store = studio_store();
    let mut cart = Cart::new();
    let line_id = cart
        .add_line(NewCartLine::from_store(&store, &catalog, "M", 1))
        .line_id()
        .unwrap()
        .to_string();

    let mut edit = cart
        .edit_line(&line_id, LayerStoreOptions::default())
        .unwrap();
    assert_eq!(edit.store().current_view(), View::Front);
    let image_id = edit.store().current_layers()[0].id.clone();
    edit.store_mut().rotate_layer(&image_id, 30.0);
    assert!(cart.commit_line_edit(edit));

    assert_eq!(cart.line(&line_id).unwrap().design_layers[0].rotation, 30.0);
    assert_eq!(store.layer(&image_id).unwrap().rotation, 0.0);
    assert!(store.undo());
    assert!(store.undo());
}
