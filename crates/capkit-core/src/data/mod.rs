//! Shared data model
//!
//! This module provides:
//! - Layers (image and text) in percent space, with their wire format
//! - Camera views of the product
//! - Read-only product tables (base images and print zones)
//! - The print-safe text palette

pub mod layer;
pub mod palette;
pub mod product;
pub mod view;

pub use layer::{
    normalize_rotation, Layer, LayerFrame, LayerId, LayerKind, LayerKindTag, LayerPatch,
    NewLayer, TextContent, DEFAULT_FONT_SIZE, DEFAULT_LAYER_EXTENT,
};
pub use palette::{PrintColor, PrintPalette};
pub use product::{default_areas, CustomizableArea, PrintRect, ProductCatalog, ProductColor};
pub use view::View;
