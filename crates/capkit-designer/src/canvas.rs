//! Canvas controller.
//!
//! [`DesignCanvas`] ties together the measured scale, the renderer and the
//! transform engine. Hosts forward container resizes and pointer events to
//! it and draw whatever [`DesignCanvas::paint`] returns. In read-only mode
//! pointer input is ignored and no controls are painted.

use std::sync::Arc;

use capkit_core::{Layer, LayerId, ProductCatalog, View};

use crate::layer_store::LayerStore;
use crate::print_area::PrintAreas;
use crate::renderer::{CanvasRenderer, HitTarget, RenderInput, RenderMode, Scene};
use crate::transform::{Modifiers, ResizeHandle, TransformEngine};
use crate::viewport::{CanvasScale, PixelPoint};

/// Result of a pointer press.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Read-only canvas or nothing to act on.
    Ignored,
    /// Background press cleared the selection.
    Deselected,
    /// The remove control deleted a layer.
    Removed(LayerId),
    /// A drag started on a layer body.
    Dragging(LayerId),
    /// A resize started on a handle.
    Resizing(LayerId, ResizeHandle),
    /// A rotation started on the rotate handle.
    Rotating(LayerId),
}

/// Interactive or read-only canvas for one product.
#[derive(Debug)]
pub struct DesignCanvas {
    scale: CanvasScale,
    renderer: CanvasRenderer,
    engine: TransformEngine,
    catalog: Arc<ProductCatalog>,
    scene: Scene,
}

impl DesignCanvas {
    pub fn new(
        catalog: Arc<ProductCatalog>,
        renderer: CanvasRenderer,
        engine: TransformEngine,
    ) -> Self {
        Self {
            scale: CanvasScale::default(),
            renderer,
            engine,
            catalog,
            scene: Scene::default(),
        }
    }

    /// Sets the initial side length before the first measurement.
    pub fn with_initial_size(mut self, size: f64) -> Self {
        self.scale = CanvasScale::new(size);
        self
    }

    pub fn scale(&self) -> &CanvasScale {
        &self.scale
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    pub fn is_read_only(&self) -> bool {
        self.renderer.mode() == RenderMode::ReadOnly
    }

    /// Switches mode; an active gesture is cancelled when going read-only.
    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode == RenderMode::ReadOnly {
            self.engine.cancel();
        }
        self.renderer.set_mode(mode);
    }

    /// Records a container measurement. Returns `true` when a repaint is due.
    pub fn observe_size(&mut self, width: f64, height: f64) -> bool {
        self.scale.observe(width, height)
    }

    /// Paints the store's active color and view.
    pub fn paint(&mut self, store: &LayerStore) -> &Scene {
        let color = store.selected_color().to_string();
        let layers = store.current_layers();
        self.scene = self.render(&color, store.current_view(), &layers, store.selected_layer_id());
        &self.scene
    }

    /// Paints a frozen layer sequence, as cart and order review do.
    pub fn paint_layers(&mut self, color: &str, view: View, layers: &[Layer]) -> &Scene {
        let refs: Vec<&Layer> = layers.iter().collect();
        self.scene = self.render(color, view, &refs, None);
        &self.scene
    }

    /// Last painted scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Target under `point` in the last painted scene.
    pub fn hit_test(&self, point: PixelPoint) -> HitTarget {
        self.scene.hit_test(point)
    }

    /// Starts whatever gesture the press lands on.
    pub fn pointer_down(&mut self, store: &mut LayerStore, point: PixelPoint) -> PointerOutcome {
        if self.is_read_only() {
            return PointerOutcome::Ignored;
        }
        self.paint(store);

        match self.hit_test(point) {
            HitTarget::Remove(id) => match store.remove_layer(&id) {
                Some(_) => PointerOutcome::Removed(id),
                None => PointerOutcome::Ignored,
            },
            HitTarget::Rotate(id) => {
                if self.engine.begin_rotate(store, &id, point) {
                    PointerOutcome::Rotating(id)
                } else {
                    PointerOutcome::Ignored
                }
            }
            HitTarget::Resize(id, handle) => {
                if self.engine.begin_resize(store, &id, handle, point) {
                    PointerOutcome::Resizing(id, handle)
                } else {
                    PointerOutcome::Ignored
                }
            }
            HitTarget::Body(id) => {
                if self.engine.begin_drag(store, &id, point) {
                    PointerOutcome::Dragging(id)
                } else {
                    PointerOutcome::Ignored
                }
            }
            HitTarget::Background => {
                store.select_layer(None);
                PointerOutcome::Deselected
            }
        }
    }

    /// Forwards a move to the active gesture. Returns `true` when a layer changed.
    pub fn pointer_move(
        &mut self,
        store: &mut LayerStore,
        point: PixelPoint,
        modifiers: Modifiers,
    ) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.engine.pointer_move(store, &self.scale, point, modifiers)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.engine.pointer_up()
    }

    /// Pointer capture lost; the layer keeps its last position.
    pub fn pointer_cancel(&mut self) -> bool {
        self.engine.cancel()
    }

    fn render(
        &self,
        color: &str,
        view: View,
        layers: &[&Layer],
        selected: Option<&LayerId>,
    ) -> Scene {
        let areas = PrintAreas::for_product(&self.catalog, color);
        let input = RenderInput {
            color,
            view,
            layers,
            selected,
            catalog: &self.catalog,
            areas: &areas,
        };
        self.renderer.render(&self.scale, &input)
    }
}
