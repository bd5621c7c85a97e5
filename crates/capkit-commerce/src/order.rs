//! Orders, order items and the status state machine.
//!
//! Placing an order freezes each cart line's design a second time into an
//! order item snapshot. Status moves one step at a time along
//! `pending -> design_confirmed -> preparing -> in_production -> shipped ->
//! delivered`; any state before `shipped` may also move to `cancelled`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use capkit_core::{Layer, OrderError};

use crate::cart::CartLine;

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Received; the design may still change
    #[default]
    Pending,
    /// Design approved for production
    DesignConfirmed,
    /// Materials being prepared
    Preparing,
    /// Being printed
    InProduction,
    /// Handed to the carrier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled before shipping
    Cancelled,
}

impl OrderStatus {
    /// Main flow in order; `Cancelled` is not part of it.
    pub const FLOW: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::DesignConfirmed,
        OrderStatus::Preparing,
        OrderStatus::InProduction,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::DesignConfirmed => "design_confirmed",
            Self::Preparing => "preparing",
            Self::InProduction => "in_production",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Customer-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Order received",
            Self::DesignConfirmed => "Design confirmed",
            Self::Preparing => "Preparing",
            Self::InProduction => "In production",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Only a pending order's design may change.
    pub fn is_design_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Position along [`FLOW`](Self::FLOW).
    pub fn flow_index(&self) -> Option<usize> {
        Self::FLOW.iter().position(|s| s == self)
    }

    /// Next state along the main flow.
    pub fn next(&self) -> Option<OrderStatus> {
        self.flow_index()
            .and_then(|i| Self::FLOW.get(i + 1))
            .copied()
    }

    /// Check if a transition from this state to `target` is valid.
    ///
    /// - each state may advance to its direct successor
    /// - any state before `Shipped` may be cancelled
    /// - `Delivered` and `Cancelled` are final
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, target) {
            (Pending | DesignConfirmed | Preparing | InProduction, Cancelled) => true,
            (from, to) => from.next() == Some(to),
        }
    }

    /// Completion percentage along the main flow; cancelled is 0.
    pub fn progress_percent(&self) -> u8 {
        match self.flow_index() {
            Some(index) => {
                let last = (Self::FLOW.len() - 1) as f64;
                (index as f64 / last * 100.0).round() as u8
            }
            None => 0,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a placed order with its frozen design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub color: String,
    pub color_label: String,
    pub size: String,
    pub quantity: u32,
    pub design_snapshot: Vec<Layer>,
}

impl OrderItem {
    /// Second freeze: an independent copy of a cart line.
    pub fn from_cart_line(line: &CartLine) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            color: line.color.clone(),
            color_label: line.color_label.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            design_snapshot: line.design_layers.clone(),
        }
    }
}

/// Audit record of one status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusHistory {
    pub from: Option<OrderStatus>,
    pub to: OrderStatus,
    pub changed_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub at: DateTime<Utc>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status_history: Vec<OrderStatusHistory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Places a pending order from cart lines.
    pub fn place(order_number: impl Into<String>, lines: &[CartLine]) -> Self {
        let now = Utc::now();
        let order = Self {
            id: Uuid::new_v4().to_string(),
            order_number: order_number.into(),
            status: OrderStatus::Pending,
            items: lines.iter().map(OrderItem::from_cart_line).collect(),
            status_history: vec![OrderStatusHistory {
                from: None,
                to: OrderStatus::Pending,
                changed_by: "system".to_string(),
                memo: None,
                at: now,
            }],
            created_at: now,
            updated_at: now,
        };
        tracing::info!(
            "Placed order {} with {} items",
            order.order_number,
            order.items.len()
        );
        order
    }

    pub fn item(&self, id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn is_design_editable(&self) -> bool {
        self.status.is_design_editable()
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn progress_percent(&self) -> u8 {
        self.status.progress_percent()
    }

    /// Moves to `to`, recording who did it.
    pub fn transition(
        &mut self,
        to: OrderStatus,
        changed_by: impl Into<String>,
        memo: Option<String>,
    ) -> Result<(), OrderError> {
        if !self.status.can_transition_to(to) {
            tracing::warn!(
                "Order {} refused transition {} -> {}",
                self.order_number,
                self.status,
                to
            );
            return Err(OrderError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }

        let now = Utc::now();
        self.status_history.push(OrderStatusHistory {
            from: Some(self.status),
            to,
            changed_by: changed_by.into(),
            memo,
            at: now,
        });
        tracing::debug!("Order {} {} -> {}", self.order_number, self.status, to);
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    /// Error returned by design mutators when the order is no longer pending.
    pub fn ensure_design_editable(&self) -> Result<(), OrderError> {
        if self.is_design_editable() {
            Ok(())
        } else {
            Err(OrderError::DesignLocked {
                status: self.status.to_string(),
            })
        }
    }
}

/// Order number `XX-YYYYMMDD-NNN` from a shop slug, date and daily sequence.
pub fn generate_order_number(slug: &str, date: NaiveDate, sequence: u32) -> String {
    let prefix: String = slug
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(2)
        .collect::<String>()
        .to_ascii_uppercase();
    format!("{}-{}-{:03}", prefix, date.format("%Y%m%d"), sequence)
}
