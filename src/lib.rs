//! # CapKit
//!
//! A multi-view product customization canvas for caps:
//! - Percent-space layers that survive any canvas size
//! - Drag, resize and rotate gestures with rotation correction
//! - Per-color designs with undo/redo and session files
//! - Cart lines and order items that freeze a copy of a design
//! - Order design re-editing gated by the order status
//!
//! ## Architecture
//!
//! CapKit is organized as a workspace with multiple crates:
//!
//! 1. **capkit-core** - Layer model, product tables, errors, events
//! 2. **capkit-designer** - Layer store, transforms, renderer, canvas
//! 3. **capkit-commerce** - Cart, orders, order design lock
//! 4. **capkit-settings** - Configuration files
//! 5. **capkit** - Studio composition and the preview binary

pub mod studio;

pub use capkit_commerce as commerce;
pub use capkit_designer as designer;
pub use capkit_settings as settings;

pub use capkit_core::{
    AppEvent, Error, EventBus, Layer, LayerId, NewLayer, OrderError, ProductCatalog, Result,
    UploadError, View,
};
pub use capkit_settings::Config;
pub use studio::{
    layer_store_options, render_options, render_previews, transform_settings, upload_policy,
    Studio,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {}", e))?;

    Ok(())
}
