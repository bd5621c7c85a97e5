use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use capkit_commerce::{
    Cart, InMemoryOrderRepository, NewCartLine, Order, OrderDesignEditor, OrderRepository,
    OrderStatus, SnapshotReplaceRequest,
};
use capkit_core::{
    AppEvent, EventBus, EventFilter, LayerId, LayerPatch, NewLayer, OrderError, OrderEvent,
    ProductCatalog, View,
};
use capkit_designer::{LayerStore, LayerStoreOptions};
use parking_lot::Mutex;

const NUMBER: &str = "RH-20241219-001";

/// Repository that can be switched offline for the next calls.
struct FlakyRepository {
    inner: InMemoryOrderRepository,
    offline: AtomicBool,
}

#[async_trait]
impl OrderRepository for FlakyRepository {
    async fn fetch_order(&self, order_number: &str) -> Result<Order, OrderError> {
        self.inner.fetch_order(order_number).await
    }

    async fn replace_designs(
        &self,
        order_number: &str,
        request: SnapshotReplaceRequest,
    ) -> Result<Order, OrderError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(OrderError::repository("connection reset"));
        }
        self.inner.replace_designs(order_number, request).await
    }
}

fn placed_order(number: &str) -> Order {
    let mut store = LayerStore::new();
    store.set_layers_for_color(
        "black",
        vec![NewLayer::image("logo.png", View::Front)
            .at(30.0, 30.0)
            .into_layer(LayerId::from("logo"))],
    );

    let mut cart = Cart::new();
    cart.add_line(NewCartLine::from_store(
        &store,
        &ProductCatalog::default_cap(),
        "M",
        2,
    ));
    Order::place(number, cart.lines())
}

fn repository() -> InMemoryOrderRepository {
    let repo = InMemoryOrderRepository::default();
    repo.insert(placed_order(NUMBER));
    repo
}

#[tokio::test]
async fn test_pending_order_saves_and_adopts_canonical() {
    let repo = repository();
    let events = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    events.subscribe(EventFilter::All, move |event: AppEvent| sink.lock().push(event));

    let mut editor = OrderDesignEditor::load(&repo, NUMBER, LayerStoreOptions::default())
        .await
        .unwrap()
        .with_event_bus(events);
    assert!(editor.is_editable());

    let logo = LayerId::from("logo");
    editor.rotate_layer(&logo, 400.0).unwrap();
    assert!(editor
        .update_layer(&logo, &LayerPatch::position(12.0, 18.0))
        .unwrap());
    let caption = editor.add_layer(NewLayer::text("Crew", View::Front)).unwrap();
    assert_eq!(editor.workspace().current_layers().len(), 2);
    let removed = editor.remove_layer(&caption).unwrap();
    assert_eq!(removed.map(|l| l.id), Some(caption.clone()));
    assert_eq!(editor.remove_layer(&caption).unwrap(), None);
    editor.save(&repo).await.unwrap();

    assert!(!editor.has_changes());
    let stored = repo.get(NUMBER).unwrap();
    assert_eq!(stored.items[0].design_snapshot.len(), 1);
    assert_eq!(stored.items[0].design_snapshot[0].rotation, 40.0);
    assert_eq!(
        (stored.items[0].design_snapshot[0].x, stored.items[0].design_snapshot[0].y),
        (12.0, 18.0)
    );
    assert_eq!(editor.order(), &stored);
    assert_eq!(
        editor.workspace().layer(&LayerId::from("logo")).unwrap().rotation,
        40.0
    );

    let seen = seen.lock();
    assert!(seen.iter().any(|e| matches!(
        e,
        AppEvent::Order(OrderEvent::DesignSaved { items: 1, .. })
    )));
}

#[tokio::test]
async fn test_shipped_order_is_read_only() {
    let repo = repository();
    for to in [
        OrderStatus::DesignConfirmed,
        OrderStatus::Preparing,
        OrderStatus::InProduction,
        OrderStatus::Shipped,
    ] {
        repo.update_status(NUMBER, to, "admin", None).unwrap();
    }

    let mut editor = OrderDesignEditor::load(&repo, NUMBER, LayerStoreOptions::default())
        .await
        .unwrap();
    assert!(editor.is_read_only());
    assert_eq!(editor.workspace().current_layers().len(), 1);

    let err = editor
        .add_layer(NewLayer::text("Late", View::Front))
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::DesignLocked {
            status: "shipped".to_string()
        }
    );
    let logo = LayerId::from("logo");
    assert!(matches!(
        editor.update_layer(&logo, &LayerPatch::position(5.0, 5.0)),
        Err(OrderError::DesignLocked { .. })
    ));
    assert!(matches!(
        editor.remove_layer(&logo),
        Err(OrderError::DesignLocked { .. })
    ));
    let layer = editor.workspace().layer(&logo).unwrap();
    assert_eq!((layer.x, layer.y), (30.0, 30.0));
    assert!(!editor.has_changes());
    assert!(matches!(
        editor.save(&repo).await,
        Err(OrderError::DesignLocked { .. })
    ));
}

#[tokio::test]
async fn test_failed_save_keeps_buffer_for_retry() {
    let repo = FlakyRepository {
        inner: repository(),
        offline: AtomicBool::new(true),
    };
    let mut editor = OrderDesignEditor::load(&repo, NUMBER, LayerStoreOptions::default())
        .await
        .unwrap();
    editor.flip_x(&LayerId::from("logo")).unwrap();

    let err = editor.save(&repo).await.unwrap_err();
    assert!(matches!(err, OrderError::Repository { .. }));
    assert!(editor.has_changes());
    assert!(!editor.is_saving());
    assert!(!repo.inner.get(NUMBER).unwrap().items[0].design_snapshot[0].flip_x);

    repo.offline.store(false, Ordering::SeqCst);
    editor.save(&repo).await.unwrap();
    assert!(repo.inner.get(NUMBER).unwrap().items[0].design_snapshot[0].flip_x);
}

#[tokio::test]
async fn test_status_change_between_load_and_save_is_rejected() {
    let repo = repository();
    let mut editor = OrderDesignEditor::load(&repo, NUMBER, LayerStoreOptions::default())
        .await
        .unwrap();
    editor
        .add_layer(
            NewLayer::text("Crew", View::Front)
                .styled(Some("#FFBB55".to_string()), None, None),
        )
        .unwrap();

    repo.update_status(NUMBER, OrderStatus::DesignConfirmed, "admin", None)
        .unwrap();
    let err = editor.save(&repo).await.unwrap_err();
    assert!(matches!(err, OrderError::DesignLocked { .. }));
    assert!(editor.has_changes());
}

#[tokio::test]
async fn test_unprintable_text_color_is_rejected() {
    let repo = repository();
    let mut editor = OrderDesignEditor::load(&repo, NUMBER, LayerStoreOptions::default())
        .await
        .unwrap();
    editor
        .add_layer(
            NewLayer::text("Crew", View::Front)
                .styled(Some("#123456".to_string()), None, None),
        )
        .unwrap();

    let err = editor.save(&repo).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidTextColor { .. }));
    assert_eq!(repo.get(NUMBER).unwrap().items[0].design_snapshot.len(), 1);
}
