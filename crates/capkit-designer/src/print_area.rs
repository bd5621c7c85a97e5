//! Print-area advisory.
//!
//! Resolves the guide rectangle for each view of one color and computes
//! default placement inside it. The rectangle is only ever drawn and used
//! for placement; nothing is clamped to it.

use std::collections::HashMap;

use capkit_core::{default_areas, CustomizableArea, LayerFrame, ProductCatalog, View};

/// Zone used for placement when a view has no advisory.
pub const FALLBACK_ZONE: LayerFrame = LayerFrame {
    x: 30.0,
    y: 30.0,
    width: 40.0,
    height: 30.0,
};

/// Side length (percent) of a layer placed without an explicit size.
pub const DEFAULT_PLACED_SIZE: f64 = 15.0;

/// Resolved advisory zones for one color.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintAreas {
    zones: HashMap<View, LayerFrame>,
}

impl PrintAreas {
    /// Resolve zones for `color`.
    ///
    /// Enabled shared areas apply first and enabled areas for this color
    /// override them per view. An empty area list means the studio defaults.
    pub fn resolve(areas: &[CustomizableArea], color: &str) -> Self {
        let defaults;
        let areas = if areas.is_empty() {
            defaults = default_areas();
            defaults.as_slice()
        } else {
            areas
        };

        let mut zones = HashMap::new();
        for area in areas.iter().filter(|a| a.rect.is_enabled && a.color_id.is_none()) {
            zones.insert(area.view, area.rect.frame());
        }
        for area in areas
            .iter()
            .filter(|a| a.rect.is_enabled && a.color_id.as_deref() == Some(color))
        {
            zones.insert(area.view, area.rect.frame());
        }

        Self { zones }
    }

    /// Resolve from a product catalog.
    pub fn for_product(catalog: &ProductCatalog, color: &str) -> Self {
        Self::resolve(&catalog.areas, color)
    }

    /// Advisory rectangle of a view, if any.
    pub fn zone(&self, view: View) -> Option<LayerFrame> {
        self.zones.get(&view).copied()
    }

    /// Default frame for a new square layer of `size` on `view`.
    pub fn placement(&self, view: View, size: f64) -> LayerFrame {
        default_layer_position(self.zone(view), size)
    }

    /// Whether `frame` lies inside the view's advisory; `None` without one.
    pub fn contains(&self, view: View, frame: &LayerFrame) -> Option<bool> {
        let zone = self.zone(view)?;
        Some(
            frame.x >= zone.x
                && frame.y >= zone.y
                && frame.x + frame.width <= zone.x + zone.width
                && frame.y + frame.height <= zone.y + zone.height,
        )
    }
}

/// Centre a `size` x `size` layer in `zone`, or in [`FALLBACK_ZONE`].
pub fn default_layer_position(zone: Option<LayerFrame>, size: f64) -> LayerFrame {
    let zone = zone.unwrap_or(FALLBACK_ZONE);
    let size = if size.is_finite() && size > 0.0 {
        size
    } else {
        DEFAULT_PLACED_SIZE
    };
    LayerFrame::new(
        zone.x + zone.width / 2.0 - size / 2.0,
        zone.y + zone.height / 2.0 - size / 2.0,
        size,
        size,
    )
}
