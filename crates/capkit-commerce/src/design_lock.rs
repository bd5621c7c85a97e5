//! Re-editing the frozen designs of a placed order.
//!
//! The editor keeps the canonical order as fetched, a workspace layer store
//! for the selected item, and a buffer of edited snapshots keyed by item id.
//! Nothing reaches the repository until an explicit save, which replaces
//! every item's snapshot at once. A failed save keeps the buffer for retry.

use std::collections::BTreeMap;
use std::sync::Arc;

use capkit_core::{
    AppEvent, EventBus, Layer, LayerId, LayerPatch, NewLayer, OrderError, OrderEvent,
};
use capkit_designer::{LayerStore, LayerStoreOptions};

use crate::order::{Order, OrderItem, OrderStatus};
use crate::repository::{ItemDesignUpdate, OrderRepository, SnapshotReplaceRequest};

/// Edit surface for one order's item designs.
pub struct OrderDesignEditor {
    order: Order,
    selected_item: Option<String>,
    workspace: LayerStore,
    buffer: BTreeMap<String, Vec<Layer>>,
    saving: bool,
    store_options: LayerStoreOptions,
    events: Arc<EventBus>,
}

impl std::fmt::Debug for OrderDesignEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderDesignEditor")
            .field("order_number", &self.order.order_number)
            .field("status", &self.order.status)
            .field("selected_item", &self.selected_item)
            .field("edited_items", &self.buffer.len())
            .field("saving", &self.saving)
            .finish()
    }
}

impl OrderDesignEditor {
    pub fn new(order: Order) -> Self {
        Self::with_options(order, LayerStoreOptions::default())
    }

    /// Editor whose workspace stores use `options`; the first item is selected.
    pub fn with_options(order: Order, options: LayerStoreOptions) -> Self {
        let mut editor = Self {
            order,
            selected_item: None,
            workspace: LayerStore::with_options(options.clone()),
            buffer: BTreeMap::new(),
            saving: false,
            store_options: options,
            events: EventBus::shared(),
        };
        if let Some(first) = editor.order.items.first().map(|i| i.id.clone()) {
            editor.reseed(&first);
        }
        editor
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Fetch the canonical order and open an editor on it.
    pub async fn load(
        repo: &dyn OrderRepository,
        order_number: &str,
        options: LayerStoreOptions,
    ) -> Result<Self, OrderError> {
        let order = repo.fetch_order(order_number).await?;
        tracing::debug!(
            "Loaded order {} ({}) for design editing",
            order.order_number,
            order.status
        );
        Ok(Self::with_options(order, options))
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn status(&self) -> OrderStatus {
        self.order.status
    }

    pub fn is_editable(&self) -> bool {
        self.order.is_design_editable()
    }

    /// Locked orders render without controls and refuse every mutator.
    pub fn is_read_only(&self) -> bool {
        !self.is_editable()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn has_changes(&self) -> bool {
        !self.buffer.is_empty()
    }

    pub fn is_item_edited(&self, item_id: &str) -> bool {
        self.buffer.contains_key(item_id)
    }

    pub fn selected_item(&self) -> Option<&OrderItem> {
        self.selected_item
            .as_deref()
            .and_then(|id| self.order.item(id))
    }

    /// Store holding the selected item's design, for painting.
    pub fn workspace(&self) -> &LayerStore {
        &self.workspace
    }

    /// Buffered design of an item, or its canonical snapshot.
    pub fn current_design(&self, item_id: &str) -> Option<&[Layer]> {
        match self.buffer.get(item_id) {
            Some(layers) => Some(layers.as_slice()),
            None => self.order.item(item_id).map(|i| i.design_snapshot.as_slice()),
        }
    }

    /// Switch the workspace to another item; allowed on locked orders too.
    pub fn select_item(&mut self, item_id: &str) -> Result<(), OrderError> {
        if self.order.item(item_id).is_none() {
            return Err(OrderError::UnknownItem {
                item_id: item_id.to_string(),
            });
        }
        if self.selected_item.as_deref() != Some(item_id) {
            self.reseed(item_id);
            tracing::debug!("Selected order item {}", item_id);
        }
        Ok(())
    }

    /// Run a mutation against the workspace and buffer the result.
    ///
    /// The closure must stay on the item's color and session. If it switches
    /// either, its changes are discarded and the workspace is reloaded.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut LayerStore) -> R) -> Result<R, OrderError> {
        self.order.ensure_design_editable()?;
        if self.saving {
            return Err(OrderError::SaveInFlight);
        }
        let item_id = self
            .selected_item
            .clone()
            .ok_or_else(|| OrderError::UnknownItem {
                item_id: String::new(),
            })?;
        let color = self
            .order
            .item(&item_id)
            .map(|item| item.color.clone())
            .ok_or_else(|| OrderError::UnknownItem {
                item_id: item_id.clone(),
            })?;
        let session_id = self.workspace.session_id().to_string();

        let result = f(&mut self.workspace);
        if self.workspace.selected_color() != color || self.workspace.session_id() != session_id {
            tracing::warn!(
                "Discarding edit that left item {} ({}) for {}",
                item_id,
                color,
                self.workspace.selected_color()
            );
            self.reseed(&item_id);
            return Err(OrderError::WorkspaceChanged { item_id, color });
        }
        self.sync_buffer(&item_id);
        Ok(result)
    }

    pub fn add_layer(&mut self, data: NewLayer) -> Result<LayerId, OrderError> {
        self.edit(|store| store.add_layer(data))
    }

    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> Result<bool, OrderError> {
        self.edit(|store| store.update_layer(id, patch))
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> Result<Option<Layer>, OrderError> {
        self.edit(|store| store.remove_layer(id))
    }

    pub fn rotate_layer(&mut self, id: &LayerId, delta: f64) -> Result<bool, OrderError> {
        self.edit(|store| store.rotate_layer(id, delta))
    }

    pub fn flip_x(&mut self, id: &LayerId) -> Result<bool, OrderError> {
        self.edit(|store| store.flip_layer_x(id))
    }

    pub fn flip_y(&mut self, id: &LayerId) -> Result<bool, OrderError> {
        self.edit(|store| store.flip_layer_y(id))
    }

    /// Drop every buffered edit and reload the selected item.
    pub fn discard_changes(&mut self) {
        if self.saving {
            tracing::warn!("Ignoring discard while a save is in flight");
            return;
        }
        self.buffer.clear();
        if let Some(id) = self.selected_item.clone() {
            self.reseed(&id);
        }
    }

    /// Mark a save as in flight and build the request covering every item.
    pub fn begin_save(&mut self) -> Result<SnapshotReplaceRequest, OrderError> {
        self.order.ensure_design_editable()?;
        if self.saving {
            return Err(OrderError::SaveInFlight);
        }
        if self.buffer.is_empty() {
            return Err(OrderError::NothingToSave);
        }

        let items = self
            .order
            .items
            .iter()
            .map(|item| ItemDesignUpdate {
                id: item.id.clone(),
                design_snapshot: self
                    .buffer
                    .get(&item.id)
                    .cloned()
                    .unwrap_or_else(|| item.design_snapshot.clone()),
            })
            .collect();

        self.saving = true;
        tracing::debug!(
            "Saving designs of order {} ({} edited items)",
            self.order.order_number,
            self.buffer.len()
        );
        Ok(SnapshotReplaceRequest { items })
    }

    /// Settle an in-flight save with the repository's answer.
    pub fn finish_save(&mut self, result: Result<Order, OrderError>) -> Result<(), OrderError> {
        if !self.saving {
            tracing::warn!(
                "Ignoring save result for order {}: no save in flight",
                self.order.order_number
            );
            return Err(OrderError::NoSaveInFlight);
        }
        self.saving = false;
        match result {
            Ok(order) => {
                let items = order.items.len();
                let order_number = order.order_number.clone();
                self.adopt_order(order);
                tracing::info!("Saved designs of order {}", order_number);
                self.events.publish(AppEvent::Order(OrderEvent::DesignSaved {
                    order_number,
                    items,
                }));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    "Design save for order {} failed, keeping {} edited items: {}",
                    self.order.order_number,
                    self.buffer.len(),
                    err
                );
                self.events
                    .publish(AppEvent::Order(OrderEvent::DesignSaveFailed {
                        order_number: self.order.order_number.clone(),
                        reason: err.to_string(),
                    }));
                Err(err)
            }
        }
    }

    /// Bulk-replace every item's snapshot through `repo`.
    pub async fn save(&mut self, repo: &dyn OrderRepository) -> Result<(), OrderError> {
        let request = self.begin_save()?;
        let order_number = self.order.order_number.clone();
        let result = repo.replace_designs(&order_number, request).await;
        self.finish_save(result)
    }

    /// Take `order` as canonical, dropping the buffer.
    pub fn adopt_order(&mut self, order: Order) {
        self.order = order;
        self.buffer.clear();

        let selected = self
            .selected_item
            .clone()
            .filter(|id| self.order.item(id).is_some())
            .or_else(|| self.order.items.first().map(|i| i.id.clone()));
        match selected {
            Some(id) => self.reseed(&id),
            None => {
                self.selected_item = None;
                self.workspace = LayerStore::with_options(self.store_options.clone());
            }
        }
    }

    fn reseed(&mut self, item_id: &str) {
        let Some(item) = self.order.item(item_id) else {
            return;
        };
        let color = item.color.clone();
        let layers = self
            .buffer
            .get(item_id)
            .cloned()
            .unwrap_or_else(|| item.design_snapshot.clone());
        self.workspace = LayerStore::seeded(&color, layers, self.store_options.clone());
        self.selected_item = Some(item_id.to_string());
    }

    fn sync_buffer(&mut self, item_id: &str) {
        let Some(item) = self.order.item(item_id) else {
            return;
        };
        let layers = self.workspace.snapshot_color(&item.color);
        if layers == item.design_snapshot {
            self.buffer.remove(item_id);
        } else {
            self.buffer.insert(item_id.to_string(), layers);
        }
    }
}
