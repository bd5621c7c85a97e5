//! # CapKit Designer
//!
//! The customization canvas: a percent-space layer model, gesture
//! transforms and a renderer shared by the editor, cart review and order
//! review.
//!
//! ## Core Components
//!
//! - **Viewport**: percent/pixel mapping for the measured square canvas
//! - **Layer Store**: per-color layer sets, selection, undo/redo, events
//! - **Transform Engine**: drag, resize and rotate with rotation correction
//! - **Print Areas**: advisory zones and default placement
//! - **Renderer**: scene description, hit testing and SVG export
//! - **Canvas**: controller wiring pointer input to the engine and store
//! - **Upload**: artwork gate run before an image layer is created
//!
//! ## Architecture
//!
//! ```text
//! pointer events -> DesignCanvas -> TransformEngine -> LayerStore
//!                        |                               |
//!                        +------ CanvasRenderer <--------+
//!                                     |
//!                                   Scene -> SVG
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use capkit_designer::{LayerStore, NewLayer, View};
//!
//! let mut store = LayerStore::new();
//! let id = store.add_layer(NewLayer::text("Hello", View::Front).at(30.0, 30.0));
//! store.rotate_layer(&id, 45.0);
//! ```

pub mod canvas;
pub mod history;
pub mod layer_set;
pub mod layer_store;
pub mod persistence;
pub mod print_area;
pub mod renderer;
pub mod svg;
pub mod transform;
pub mod upload;
pub mod viewport;

pub use canvas::{DesignCanvas, PointerOutcome};
pub use history::{History, DEFAULT_HISTORY_DEPTH};
pub use layer_set::ColorLayerSet;
pub use layer_store::{
    generate_session_id, ColorMap, LayerStore, LayerStoreOptions, DEFAULT_COLOR,
};
pub use persistence::{load_layers_from_file, SessionFile, SessionMetadata, FILE_FORMAT_VERSION};
pub use print_area::{default_layer_position, PrintAreas, DEFAULT_PLACED_SIZE, FALLBACK_ZONE};
pub use renderer::{
    CanvasRenderer, DrawCommand, HitTarget, LayerSprite, RenderInput, RenderMode, RenderOptions,
    Scene, SelectionHandles, SpriteContent, DEFAULT_TEXT_COLOR, PRINT_AREA_LABEL,
};
pub use svg::scene_to_svg;
pub use transform::{
    GestureState, Modifiers, ResizeHandle, TransformEngine, TransformSettings,
};
pub use upload::{validate_upload, ImageUpload, UploadPolicy};
pub use viewport::{CanvasScale, PixelPoint, PixelRect};

pub use capkit_core::{Layer, LayerFrame, LayerId, LayerKind, LayerPatch, NewLayer, View};
