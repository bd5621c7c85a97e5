//! # CapKit Core
//!
//! Core types and utilities shared by the CapKit crates: the layer data
//! model and its wire format, read-only product tables, error types, and the
//! event bus used by the state containers.

pub mod data;
pub mod error;
pub mod event_bus;

pub use data::{
    default_areas, normalize_rotation, CustomizableArea, Layer, LayerFrame, LayerId, LayerKind,
    LayerKindTag, LayerPatch, NewLayer, PrintColor, PrintPalette, PrintRect, ProductCatalog,
    ProductColor, TextContent, View, DEFAULT_FONT_SIZE, DEFAULT_LAYER_EXTENT,
};

pub use error::{Error, OrderError, PersistenceError, Result, UploadError};

pub use event_bus::{
    AppEvent, CartEvent, DesignEvent, EventBus, EventCategory, EventFilter, OrderEvent,
    SubscriptionId,
};
