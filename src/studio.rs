//! Studio composition.
//!
//! Builds the designer, cart and upload gate from a [`Config`] and wires
//! them to one event bus. The binary and embedding applications go through
//! this type instead of assembling the pieces themselves.

use std::sync::Arc;

use capkit_commerce::{AddOutcome, Cart, NewCartLine};
use capkit_core::{
    EventBus, Layer, LayerId, NewLayer, PrintPalette, ProductCatalog, UploadError, View,
};
use capkit_designer::{
    scene_to_svg, validate_upload, CanvasRenderer, DesignCanvas, LayerStore, LayerStoreOptions,
    PrintAreas, RenderMode, RenderOptions, Scene, TransformEngine, TransformSettings,
    UploadPolicy,
};
use capkit_settings::Config;

pub fn layer_store_options(config: &Config) -> LayerStoreOptions {
    LayerStoreOptions {
        default_color: config.layers.default_color.clone(),
        default_view: config.layers.default_view,
        history_depth: config.layers.history_depth,
    }
}

pub fn transform_settings(config: &Config) -> TransformSettings {
    let t = &config.transform;
    TransformSettings {
        bound_drag_to_canvas: t.bound_drag_to_canvas,
        rotation_snap: t.rotation_snap,
        min_font_size: t.min_font_size,
        max_font_size: t.max_font_size,
        min_layer_size: t.min_layer_size,
    }
}

pub fn render_options(config: &Config, mode: RenderMode) -> RenderOptions {
    let r = &config.render;
    RenderOptions {
        mode,
        show_print_area: r.show_print_area,
        show_view_label: r.show_view_label,
        mirror_exempt_colors: r.mirror_exempt_colors.clone(),
        handle_radius: r.handle_radius,
        rotate_handle_offset: r.rotate_handle_offset,
    }
}

pub fn upload_policy(config: &Config) -> UploadPolicy {
    let u = &config.upload;
    UploadPolicy {
        max_bytes: u.max_bytes,
        min_width: u.min_width,
        min_height: u.min_height,
        ..UploadPolicy::default()
    }
    .with_format_names(&u.accepted_formats)
}

/// Read-only SVG preview of every view of `color` that has layers.
pub fn render_previews(
    config: &Config,
    catalog: Arc<ProductCatalog>,
    color: &str,
    layers: &[Layer],
) -> Vec<(View, String)> {
    let mut canvas = DesignCanvas::new(
        catalog,
        CanvasRenderer::new(render_options(config, RenderMode::ReadOnly)),
        TransformEngine::new(transform_settings(config)),
    )
    .with_initial_size(config.canvas.initial_size);

    View::ALL
        .into_iter()
        .filter_map(|view| {
            let on_view: Vec<Layer> = layers.iter().filter(|l| l.view == view).cloned().collect();
            if on_view.is_empty() {
                return None;
            }
            Some((view, scene_to_svg(canvas.paint_layers(color, view, &on_view))))
        })
        .collect()
}

/// Editor, cart and upload gate configured from one [`Config`].
pub struct Studio {
    config: Config,
    catalog: Arc<ProductCatalog>,
    palette: PrintPalette,
    events: Arc<EventBus>,
    store: LayerStore,
    canvas: DesignCanvas,
    cart: Cart,
    upload_policy: UploadPolicy,
}

impl Studio {
    pub fn from_config(config: Config) -> Self {
        Self::with_catalog(config, ProductCatalog::default_cap())
    }

    pub fn with_catalog(config: Config, catalog: ProductCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let events = Arc::new(EventBus::new());

        let store = LayerStore::with_options(layer_store_options(&config))
            .with_event_bus(events.clone());
        let canvas = DesignCanvas::new(
            catalog.clone(),
            CanvasRenderer::new(render_options(&config, RenderMode::Interactive)),
            TransformEngine::new(transform_settings(&config)),
        )
        .with_initial_size(config.canvas.initial_size);
        let cart = Cart::new()
            .with_merge_tolerance(config.cart.merge_tolerance)
            .with_event_bus(events.clone());
        let upload_policy = upload_policy(&config);

        tracing::debug!(
            "Studio ready: color {}, view {}, canvas {}px",
            config.layers.default_color,
            config.layers.default_view,
            config.canvas.initial_size
        );

        Self {
            config,
            catalog,
            palette: PrintPalette::default(),
            events,
            store,
            canvas,
            cart,
            upload_policy,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<ProductCatalog> {
        &self.catalog
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LayerStore {
        &mut self.store
    }

    pub fn canvas(&self) -> &DesignCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut DesignCanvas {
        &mut self.canvas
    }

    /// Canvas and store together, for pointer handling.
    pub fn canvas_and_store(&mut self) -> (&mut DesignCanvas, &mut LayerStore) {
        (&mut self.canvas, &mut self.store)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    /// Validates an upload and places it centred in the current view's print area.
    pub fn place_upload(&mut self, bytes: &[u8]) -> Result<LayerId, UploadError> {
        let upload = validate_upload(bytes, &self.upload_policy)?;
        let view = self.store.current_view();
        let frame = self.placement(view);
        Ok(self.store.add_layer(upload.to_new_layer(view).placed(frame)))
    }

    /// Adds a text layer in the first print ink at the default font size.
    pub fn place_text(&mut self, text: &str) -> LayerId {
        let view = self.store.current_view();
        let frame = self.placement(view);
        let layer = NewLayer::text(text, view).placed(frame).styled(
            Some(self.palette.fallback().to_string()),
            Some(self.config.layers.default_font_size),
            None,
        );
        self.store.add_layer(layer)
    }

    /// Freezes the active color's design into the cart.
    pub fn add_to_cart(&mut self, size: &str, quantity: u32) -> AddOutcome {
        let line = NewCartLine::from_store(&self.store, &self.catalog, size, quantity)
            .with_product(
                self.config.cart.product_id.as_str(),
                self.config.cart.product_name.as_str(),
            );
        self.cart.add_line(line)
    }

    /// Repaints the editor for the store's current color and view.
    pub fn paint(&mut self) -> &Scene {
        self.canvas.paint(&self.store)
    }

    /// Previews of the active color's design.
    pub fn previews(&self) -> Vec<(View, String)> {
        let color = self.store.selected_color();
        render_previews(
            &self.config,
            self.catalog.clone(),
            color,
            &self.store.snapshot_color(color),
        )
    }

    fn placement(&self, view: View) -> capkit_core::LayerFrame {
        PrintAreas::for_product(&self.catalog, self.store.selected_color())
            .placement(view, self.config.layers.default_placed_size)
    }
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("session_id", &self.store.session_id())
            .field("selected_color", &self.store.selected_color())
            .field("cart_lines", &self.cart.len())
            .finish()
    }
}
