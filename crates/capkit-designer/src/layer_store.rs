//! Layer store: the canonical per-color design state.
//!
//! Layers are partitioned by color, then by view. Mutators act on the active
//! color unless a color is named explicitly; unknown ids are ignored. Every
//! mutation that changes something is recorded in the undo history, stamps
//! the last-modified time, and is announced on the injected [`EventBus`].

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use capkit_core::{
    normalize_rotation, AppEvent, DesignEvent, EventBus, EventFilter, Layer, LayerId, LayerPatch,
    NewLayer, SubscriptionId, View,
};

use crate::history::{History, DEFAULT_HISTORY_DEPTH};
use crate::layer_set::ColorLayerSet;

/// Color id to that color's layers.
pub type ColorMap = BTreeMap<String, ColorLayerSet>;

/// Color selected when a session starts.
pub const DEFAULT_COLOR: &str = "black";

/// Construction options for a [`LayerStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStoreOptions {
    pub default_color: String,
    pub default_view: View,
    pub history_depth: usize,
}

impl Default for LayerStoreOptions {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR.to_string(),
            default_view: View::Front,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Generate a session identifier of the form `session_<millis>_<suffix>`.
pub fn generate_session_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// State container for one design session.
#[derive(Debug)]
pub struct LayerStore {
    pub(crate) session_id: String,
    pub(crate) colors: ColorMap,
    pub(crate) selected_color: String,
    pub(crate) current_view: View,
    pub(crate) selected_layer: Option<LayerId>,
    pub(crate) last_modified: DateTime<Utc>,
    history: History<ColorMap>,
    options: LayerStoreOptions,
    events: Arc<EventBus>,
}

impl LayerStore {
    /// Creates an empty session with default options and a private bus.
    pub fn new() -> Self {
        Self::with_options(LayerStoreOptions::default())
    }

    pub fn with_options(options: LayerStoreOptions) -> Self {
        Self {
            session_id: generate_session_id(),
            colors: ColorMap::new(),
            selected_color: options.default_color.clone(),
            current_view: options.default_view,
            selected_layer: None,
            last_modified: Utc::now(),
            history: History::with_depth(options.history_depth),
            options,
            events: EventBus::shared(),
        }
    }

    /// Publish on a shared bus instead of the private one.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    /// Changes the undo depth, dropping recorded history.
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.options.history_depth = depth;
        self.history = History::with_depth(depth);
        self
    }

    /// Scratch store holding one color's layers, with that color active.
    ///
    /// Nothing is recorded in history, so undo never empties the seed.
    /// Used to edit frozen cart and order designs.
    pub fn seeded(color: &str, layers: Vec<Layer>, options: LayerStoreOptions) -> Self {
        let mut store = Self::with_options(options);
        store
            .colors
            .insert(color.to_string(), ColorLayerSet::from(layers));
        store.selected_color = color.to_string();
        if let Some(first) = store.colors.get(color).and_then(|set| set.iter().next()) {
            store.current_view = first.view;
        }
        store
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(filter, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ---- queries ----

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn selected_color(&self) -> &str {
        &self.selected_color
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn selected_layer_id(&self) -> Option<&LayerId> {
        self.selected_layer.as_ref()
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn options(&self) -> &LayerStoreOptions {
        &self.options
    }

    /// Layers of the active color, all views.
    pub fn current_layers(&self) -> Vec<&Layer> {
        self.layers_for_color(&self.selected_color)
    }

    /// Layers of the active color on the active view.
    pub fn current_view_layers(&self) -> Vec<&Layer> {
        self.colors
            .get(&self.selected_color)
            .map(|set| set.in_view(self.current_view).collect())
            .unwrap_or_default()
    }

    pub fn layers_for_color(&self, color: &str) -> Vec<&Layer> {
        self.colors
            .get(color)
            .map(|set| set.iter().collect())
            .unwrap_or_default()
    }

    /// Layer by id in the active color.
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.colors.get(&self.selected_color)?.get(id)
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected_layer.as_ref().and_then(|id| self.layer(id))
    }

    pub fn has_design_for_color(&self, color: &str) -> bool {
        self.colors.get(color).is_some_and(|set| !set.is_empty())
    }

    /// Colors holding at least one layer, in id order.
    pub fn colors_with_design(&self) -> Vec<&str> {
        self.colors
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(color, _)| color.as_str())
            .collect()
    }

    /// Deep copy of one color's full layer sequence, for freezing.
    pub fn snapshot_color(&self, color: &str) -> Vec<Layer> {
        self.colors
            .get(color)
            .map(ColorLayerSet::to_vec)
            .unwrap_or_default()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- layer mutators (active color) ----

    /// Appends a layer to the active color and selects it.
    pub fn add_layer(&mut self, data: NewLayer) -> LayerId {
        self.checkpoint();
        let layer = data.into_layer(LayerId::generate());
        let color = self.selected_color.clone();
        let id = self.colors.entry(color.clone()).or_default().push(layer);
        self.touch();

        tracing::debug!("Added layer {} to {}", id, color);
        self.publish(DesignEvent::LayerAdded {
            color,
            layer_id: id.clone(),
        });
        self.set_selection(Some(id.clone()));
        id
    }

    /// Merges `patch` into a layer of the active color.
    ///
    /// Returns `false` when the id is unknown or nothing changed.
    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> bool {
        self.edit_layer(id, true, |layer| layer.apply(patch))
    }

    /// Like [`update_layer`](Self::update_layer) but without a history entry.
    ///
    /// Gestures call [`checkpoint`](Self::checkpoint) once, then stream
    /// transient updates so a whole drag undoes in one step.
    pub fn update_layer_transient(&mut self, id: &LayerId, patch: &LayerPatch) -> bool {
        self.edit_layer(id, false, |layer| layer.apply(patch))
    }

    /// Records the current state as an undo step.
    pub fn checkpoint(&mut self) {
        self.history.record(self.colors.clone());
    }

    /// Removes a layer from the active color, clearing selection if needed.
    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        if self.layer(id).is_none() {
            tracing::debug!("remove_layer: unknown layer {}", id);
            return None;
        }

        self.checkpoint();
        let color = self.selected_color.clone();
        let removed = self.colors.get_mut(&color).and_then(|set| set.remove(id));
        self.touch();

        self.publish(DesignEvent::LayerRemoved {
            color,
            layer_id: id.clone(),
        });
        if self.selected_layer.as_ref() == Some(id) {
            self.set_selection(None);
        }
        removed
    }

    /// Selects a layer of the active color, or clears the selection.
    ///
    /// Unknown ids leave the selection untouched.
    pub fn select_layer(&mut self, id: Option<&LayerId>) {
        match id {
            Some(id) if self.layer(id).is_none() => {
                tracing::debug!("select_layer: unknown layer {}", id);
            }
            other => self.set_selection(other.cloned()),
        }
    }

    /// Adds `delta` degrees to a layer's rotation, wrapping into `[0, 360)`.
    pub fn rotate_layer(&mut self, id: &LayerId, delta: f64) -> bool {
        self.edit_layer(id, true, |layer| {
            let rotation = normalize_rotation(layer.rotation + delta);
            let changed = rotation != layer.rotation;
            layer.rotation = rotation;
            changed
        })
    }

    pub fn flip_layer_x(&mut self, id: &LayerId) -> bool {
        self.edit_layer(id, true, |layer| {
            layer.flip_x = !layer.flip_x;
            true
        })
    }

    pub fn flip_layer_y(&mut self, id: &LayerId) -> bool {
        self.edit_layer(id, true, |layer| {
            layer.flip_y = !layer.flip_y;
            true
        })
    }

    // ---- color and view ----

    /// Switches the working color; other colors keep their layers.
    pub fn set_selected_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        if color == self.selected_color {
            return;
        }
        self.selected_color = color.clone();
        self.touch();
        self.publish(DesignEvent::ColorChanged { color });
        self.set_selection(None);
    }

    pub fn set_current_view(&mut self, view: View) {
        if view == self.current_view {
            return;
        }
        self.current_view = view;
        self.touch();
        self.publish(DesignEvent::ViewChanged { view });
    }

    /// Empties one color, leaving every other color untouched.
    pub fn clear_color_design(&mut self, color: &str) {
        if !self.has_design_for_color(color) {
            return;
        }

        self.checkpoint();
        if let Some(set) = self.colors.get_mut(color) {
            set.clear();
        }
        self.touch();

        tracing::debug!("Cleared design for {}", color);
        self.publish(DesignEvent::ColorCleared {
            color: color.to_string(),
        });
        if color == self.selected_color && self.selected_layer.is_some() {
            self.set_selection(None);
        }
    }

    /// Replaces `to`'s layers with a deep copy of `from`'s under fresh ids.
    ///
    /// Returns the number of layers copied.
    pub fn copy_design_to_color(&mut self, from: &str, to: &str) -> usize {
        if from == to {
            return 0;
        }
        let copied = self
            .colors
            .get(from)
            .map(ColorLayerSet::duplicate_with_fresh_ids)
            .unwrap_or_default();
        if copied.is_empty() && !self.has_design_for_color(to) {
            return 0;
        }

        self.checkpoint();
        let count = copied.len();
        self.colors.insert(to.to_string(), copied);
        self.touch();

        tracing::debug!("Copied {} layers from {} to {}", count, from, to);
        self.publish(DesignEvent::DesignCopied {
            from: from.to_string(),
            to: to.to_string(),
            count,
        });
        if to == self.selected_color && self.selected_layer.is_some() {
            self.set_selection(None);
        }
        count
    }

    /// Replaces a color's layers and makes it the active color.
    pub fn set_layers_for_color(&mut self, color: &str, layers: Vec<Layer>) {
        self.checkpoint();
        let set = ColorLayerSet::from(layers);
        let count = set.len();
        self.colors.insert(color.to_string(), set);
        self.touch();

        self.publish(DesignEvent::LayersReplaced {
            color: color.to_string(),
            count,
        });
        if self.selected_color != color {
            self.selected_color = color.to_string();
            self.publish(DesignEvent::ColorChanged {
                color: color.to_string(),
            });
        }
        self.set_selection(None);
    }

    // ---- history and session ----

    pub fn undo(&mut self) -> bool {
        self.restore(true)
    }

    pub fn redo(&mut self) -> bool {
        self.restore(false)
    }

    /// Empties every color and drops history; the session id is kept.
    pub fn clear_design(&mut self) {
        self.colors.clear();
        self.history.clear();
        self.touch();
        self.publish(DesignEvent::DesignCleared);
        self.set_selection(None);
    }

    /// Starts over with a fresh session id and default color and view.
    pub fn new_session(&mut self) -> &str {
        self.session_id = generate_session_id();
        self.colors.clear();
        self.history.clear();
        self.selected_color = self.options.default_color.clone();
        self.current_view = self.options.default_view;
        self.selected_layer = None;
        self.touch();

        tracing::info!("New design session {}", self.session_id);
        self.publish(DesignEvent::SessionReset {
            session_id: self.session_id.clone(),
        });
        &self.session_id
    }

    // ---- internals ----

    fn edit_layer<F>(&mut self, id: &LayerId, record: bool, edit: F) -> bool
    where
        F: FnOnce(&mut Layer) -> bool,
    {
        let Some(current) = self.layer(id) else {
            tracing::debug!("Ignoring edit of unknown layer {}", id);
            return false;
        };

        let mut edited = current.clone();
        if !edit(&mut edited) {
            return false;
        }

        if record {
            self.checkpoint();
        }
        let color = self.selected_color.clone();
        if let Some(slot) = self.colors.get_mut(&color).and_then(|set| set.get_mut(id)) {
            *slot = edited;
        }
        self.touch();

        self.publish(DesignEvent::LayerUpdated {
            color,
            layer_id: id.clone(),
        });
        true
    }

    fn restore(&mut self, undo: bool) -> bool {
        let current = self.colors.clone();
        let restored = if undo {
            self.history.undo(current)
        } else {
            self.history.redo(current)
        };
        let Some(colors) = restored else {
            return false;
        };

        self.colors = colors;
        self.touch();
        self.publish(DesignEvent::HistoryRestored { undo });
        self.set_selection(None);
        true
    }

    pub(crate) fn clear_history(&mut self) {
        self.history.clear();
    }

    fn set_selection(&mut self, id: Option<LayerId>) {
        if self.selected_layer == id {
            return;
        }
        self.selected_layer = id.clone();
        self.publish(DesignEvent::SelectionChanged { layer_id: id });
    }

    fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    fn publish(&self, event: DesignEvent) {
        self.events.publish(AppEvent::Design(event));
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}
