//! Order storage seam.
//!
//! The editor talks to orders only through [`OrderRepository`]. The snapshot
//! replace request covers every item of the order and is applied all or
//! nothing. There is no concurrency token; the last save wins.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use capkit_core::{
    normalize_rotation, AppEvent, EventBus, Layer, OrderError, OrderEvent, PrintPalette,
};

use crate::order::{Order, OrderStatus};

/// New snapshot for one order item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDesignUpdate {
    pub id: String,
    pub design_snapshot: Vec<Layer>,
}

/// Body of a design save: `{items: [{id, designSnapshot}]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotReplaceRequest {
    pub items: Vec<ItemDesignUpdate>,
}

/// Loads orders and replaces their design snapshots.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Canonical order by number.
    async fn fetch_order(&self, order_number: &str) -> Result<Order, OrderError>;

    /// Replace each named item's snapshot and return the canonical order.
    async fn replace_designs(
        &self,
        order_number: &str,
        request: SnapshotReplaceRequest,
    ) -> Result<Order, OrderError>;
}

/// Orders held in memory, keyed by order number.
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<String, Order>>,
    palette: PrintPalette,
    events: Arc<EventBus>,
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new(PrintPalette::default())
    }
}

impl std::fmt::Debug for InMemoryOrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryOrderRepository")
            .field("orders", &self.orders.read().len())
            .finish()
    }
}

impl InMemoryOrderRepository {
    pub fn new(palette: PrintPalette) -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            palette,
            events: EventBus::shared(),
        }
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn palette(&self) -> &PrintPalette {
        &self.palette
    }

    /// Stores or replaces an order.
    pub fn insert(&self, order: Order) {
        self.orders.write().insert(order.order_number.clone(), order);
    }

    pub fn get(&self, order_number: &str) -> Option<Order> {
        self.orders.read().get(order_number).cloned()
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    /// Moves an order's status, as an admin would.
    pub fn update_status(
        &self,
        order_number: &str,
        to: OrderStatus,
        changed_by: &str,
        memo: Option<String>,
    ) -> Result<Order, OrderError> {
        let updated = {
            let mut orders = self.orders.write();
            let order = orders
                .get_mut(order_number)
                .ok_or_else(|| not_found(order_number))?;
            let from = order.status;
            order.transition(to, changed_by, memo)?;
            (order.clone(), from)
        };

        let (order, from) = updated;
        self.events.publish(AppEvent::Order(OrderEvent::StatusChanged {
            order_number: order_number.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }));
        Ok(order)
    }

    fn validate(&self, order: &Order, request: &SnapshotReplaceRequest) -> Result<(), OrderError> {
        order.ensure_design_editable()?;

        for update in &request.items {
            if order.item(&update.id).is_none() {
                return Err(OrderError::UnknownItem {
                    item_id: update.id.clone(),
                });
            }
            for layer in &update.design_snapshot {
                if let Some(text) = layer.text() {
                    let color = text.color.as_deref().unwrap_or_default();
                    if !self.palette.is_allowed(color) {
                        return Err(OrderError::InvalidTextColor {
                            layer_id: layer.id.to_string(),
                            color: color.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn fetch_order(&self, order_number: &str) -> Result<Order, OrderError> {
        self.get(order_number).ok_or_else(|| not_found(order_number))
    }

    async fn replace_designs(
        &self,
        order_number: &str,
        request: SnapshotReplaceRequest,
    ) -> Result<Order, OrderError> {
        let mut orders = self.orders.write();
        let order = orders
            .get_mut(order_number)
            .ok_or_else(|| not_found(order_number))?;

        self.validate(order, &request)?;

        for update in request.items {
            if let Some(item) = order.item_mut(&update.id) {
                item.design_snapshot = update
                    .design_snapshot
                    .into_iter()
                    .map(normalize_layer)
                    .collect();
            }
        }
        order.updated_at = Utc::now();
        tracing::info!("Replaced designs of order {}", order_number);
        Ok(order.clone())
    }
}

fn normalize_layer(mut layer: Layer) -> Layer {
    layer.rotation = normalize_rotation(layer.rotation);
    layer
}

fn not_found(order_number: &str) -> OrderError {
    OrderError::NotFound {
        order_number: order_number.to_string(),
    }
}
