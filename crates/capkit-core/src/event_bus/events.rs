//! Event type definitions for the event bus.
//!
//! Events are grouped by the component that raises them. They are cloneable
//! and serializable so hosts can log or forward them.

use serde::{Deserialize, Serialize};

use crate::data::{LayerId, View};

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Layer store changes
    Design(DesignEvent),
    /// Cart line changes
    Cart(CartEvent),
    /// Order status and snapshot saves
    Order(OrderEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Design(DesignEvent::SelectionChanged { .. }) => EventCategory::Selection,
            AppEvent::Design(_) => EventCategory::Design,
            AppEvent::Cart(_) => EventCategory::Cart,
            AppEvent::Order(_) => EventCategory::Order,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Design(e) => e.description(),
            AppEvent::Cart(e) => e.description(),
            AppEvent::Order(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Layer content and session changes.
    Design,
    /// Selection changes only.
    Selection,
    /// Cart changes.
    Cart,
    /// Order changes.
    Order,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Design => write!(f, "Design"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Cart => write!(f, "Cart"),
            EventCategory::Order => write!(f, "Order"),
        }
    }
}

/// Layer store events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DesignEvent {
    /// A layer was appended to a color.
    LayerAdded { color: String, layer_id: LayerId },
    /// A layer's fields changed.
    LayerUpdated { color: String, layer_id: LayerId },
    /// A layer was removed.
    LayerRemoved { color: String, layer_id: LayerId },
    /// Selected layer changed.
    SelectionChanged { layer_id: Option<LayerId> },
    /// Active color switched.
    ColorChanged { color: String },
    /// Active view switched.
    ViewChanged { view: View },
    /// One color's layers were emptied.
    ColorCleared { color: String },
    /// Layers of one color were copied to another.
    DesignCopied { from: String, to: String, count: usize },
    /// A color's layers were replaced wholesale.
    LayersReplaced { color: String, count: usize },
    /// History moved backward (`undo = true`) or forward.
    HistoryRestored { undo: bool },
    /// All colors were emptied.
    DesignCleared,
    /// A fresh session started.
    SessionReset { session_id: String },
}

impl DesignEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            DesignEvent::LayerAdded { color, layer_id } => {
                format!("Layer {} added to {}", layer_id, color)
            }
            DesignEvent::LayerUpdated { color, layer_id } => {
                format!("Layer {} updated in {}", layer_id, color)
            }
            DesignEvent::LayerRemoved { color, layer_id } => {
                format!("Layer {} removed from {}", layer_id, color)
            }
            DesignEvent::SelectionChanged { layer_id } => match layer_id {
                Some(id) => format!("Selected layer {}", id),
                None => "Selection cleared".to_string(),
            },
            DesignEvent::ColorChanged { color } => format!("Active color set to {}", color),
            DesignEvent::ViewChanged { view } => format!("Active view set to {}", view),
            DesignEvent::ColorCleared { color } => format!("Design cleared for {}", color),
            DesignEvent::DesignCopied { from, to, count } => {
                format!("Copied {} layers from {} to {}", count, from, to)
            }
            DesignEvent::LayersReplaced { color, count } => {
                format!("Loaded {} layers into {}", count, color)
            }
            DesignEvent::HistoryRestored { undo } => {
                if *undo {
                    "Undo".to_string()
                } else {
                    "Redo".to_string()
                }
            }
            DesignEvent::DesignCleared => "All designs cleared".to_string(),
            DesignEvent::SessionReset { session_id } => {
                format!("New session {}", session_id)
            }
        }
    }
}

/// Cart events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartEvent {
    /// A new line was appended.
    LineAdded { line_id: String },
    /// An equal line absorbed the quantity.
    LineMerged { line_id: String, quantity: u32 },
    /// A line's quantity was set.
    QuantityChanged { line_id: String, quantity: u32 },
    /// A line's frozen design was replaced.
    DesignUpdated { line_id: String },
    /// A line was removed.
    LineRemoved { line_id: String },
    /// All lines were removed.
    Cleared,
}

impl CartEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            CartEvent::LineAdded { line_id } => format!("Cart line {} added", line_id),
            CartEvent::LineMerged { line_id, quantity } => {
                format!("Cart line {} merged, quantity {}", line_id, quantity)
            }
            CartEvent::QuantityChanged { line_id, quantity } => {
                format!("Cart line {} quantity {}", line_id, quantity)
            }
            CartEvent::DesignUpdated { line_id } => {
                format!("Cart line {} design updated", line_id)
            }
            CartEvent::LineRemoved { line_id } => format!("Cart line {} removed", line_id),
            CartEvent::Cleared => "Cart cleared".to_string(),
        }
    }
}

/// Order events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderEvent {
    /// Order status moved.
    StatusChanged {
        order_number: String,
        from: String,
        to: String,
    },
    /// Snapshot replace succeeded.
    DesignSaved { order_number: String, items: usize },
    /// Snapshot replace failed; the edit buffer is kept.
    DesignSaveFailed { order_number: String, reason: String },
}

impl OrderEvent {
    /// Get a short description of this event
    pub fn description(&self) -> String {
        match self {
            OrderEvent::StatusChanged {
                order_number,
                from,
                to,
            } => format!("Order {} moved from {} to {}", order_number, from, to),
            OrderEvent::DesignSaved {
                order_number,
                items,
            } => format!("Order {} design saved ({} items)", order_number, items),
            OrderEvent::DesignSaveFailed {
                order_number,
                reason,
            } => format!("Order {} design save failed: {}", order_number, reason),
        }
    }
}
