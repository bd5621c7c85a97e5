//! # CapKit Commerce
//!
//! Freezing designs into cart lines and orders, and re-editing an order's
//! designs while it is still pending.
//!
//! ## Core Components
//!
//! - **Cart**: lines that own a deep copy of one color's layers, merged when
//!   their designs match within a position tolerance
//! - **Orders**: second freeze into order items and the status state machine
//! - **Design Lock**: buffered editor that only writes while the order is
//!   `pending`
//! - **Repository**: async seam for loading orders and replacing snapshots

pub mod cart;
pub mod design_lock;
pub mod order;
pub mod repository;

pub use cart::{
    designs_equal, generate_line_id, AddOutcome, Cart, CartLine, LineEdit, NewCartLine,
    DEFAULT_MERGE_TOLERANCE, DEFAULT_PRODUCT_ID, DEFAULT_PRODUCT_NAME,
};
pub use design_lock::OrderDesignEditor;
pub use order::{generate_order_number, Order, OrderItem, OrderStatus, OrderStatusHistory};
pub use repository::{
    InMemoryOrderRepository, ItemDesignUpdate, OrderRepository, SnapshotReplaceRequest,
};
