//! Cart lines and the first design freeze.
//!
//! Adding to the cart deep copies the active color's full layer sequence
//! (every view) into a line. Two lines are the same line when color, size
//! and design match; adding an equal line sums the quantities instead of
//! appending.
//!
//! A line's design is edited through a [`LineEdit`]: a scratch layer store
//! seeded from the line. Committing writes back into that line only, never
//! into the live session.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use capkit_core::{AppEvent, CartEvent, EventBus, Layer, ProductCatalog};
use capkit_designer::{LayerStore, LayerStoreOptions};

/// Position difference (percent) below which two layers count as equal.
pub const DEFAULT_MERGE_TOLERANCE: f64 = 1.0;

pub const DEFAULT_PRODUCT_ID: &str = "custom-hat";
pub const DEFAULT_PRODUCT_NAME: &str = "Custom Cap";

/// Cart file format version
const CART_FORMAT_VERSION: &str = "1.0";

/// One cart line: a frozen design in one color and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub color: String,
    pub color_label: String,
    pub size: String,
    pub quantity: u32,
    pub design_layers: Vec<Layer>,
    pub created_at: DateTime<Utc>,
}

/// Line data before it gets an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub product_id: String,
    pub product_name: String,
    pub color: String,
    pub color_label: String,
    pub size: String,
    pub quantity: u32,
    pub design_layers: Vec<Layer>,
}

impl NewCartLine {
    /// Freezes the store's active color into line data.
    pub fn from_store(
        store: &LayerStore,
        catalog: &ProductCatalog,
        size: impl Into<String>,
        quantity: u32,
    ) -> Self {
        let color = store.selected_color();
        Self {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            color: color.to_string(),
            color_label: catalog.color_label(color).to_string(),
            size: size.into(),
            quantity,
            design_layers: store.snapshot_color(color),
        }
    }

    pub fn with_product(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.product_id = id.into();
        self.product_name = name.into();
        self
    }

    fn into_line(self) -> CartLine {
        CartLine {
            id: generate_line_id(),
            product_id: self.product_id,
            product_name: self.product_name,
            color: self.color,
            color_label: self.color_label,
            size: self.size,
            quantity: self.quantity,
            design_layers: self.design_layers,
            created_at: Utc::now(),
        }
    }
}

/// What [`Cart::add_line`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended.
    Added(String),
    /// An equal line absorbed the quantity.
    Merged { line_id: String, quantity: u32 },
    /// Zero quantity; nothing changed.
    Ignored,
}

impl AddOutcome {
    pub fn line_id(&self) -> Option<&str> {
        match self {
            AddOutcome::Added(id) | AddOutcome::Merged { line_id: id, .. } => Some(id),
            AddOutcome::Ignored => None,
        }
    }
}

/// Line ids look like `cart_<uuid>`.
pub fn generate_line_id() -> String {
    format!("cart_{}", Uuid::new_v4().simple())
}

/// Whether two frozen designs are the same for merging purposes.
///
/// Same length and, pairwise, equal content, view, rotation and flips with
/// `x`/`y` closer than `tolerance`.
pub fn designs_equal(a: &[Layer], b: &[Layer], tolerance: f64) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(l, r)| {
            l.content() == r.content()
                && l.view == r.view
                && (l.x - r.x).abs() < tolerance
                && (l.y - r.y).abs() < tolerance
                && l.rotation == r.rotation
                && l.flip_x == r.flip_x
                && l.flip_y == r.flip_y
        })
}

/// Scratch editing session for one line's design.
#[derive(Debug)]
pub struct LineEdit {
    line_id: String,
    store: LayerStore,
}

impl LineEdit {
    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LayerStore {
        &mut self.store
    }

    /// Current design of the scratch store.
    pub fn design(&self) -> Vec<Layer> {
        self.store.snapshot_color(self.store.selected_color())
    }
}

#[derive(Serialize, Deserialize)]
struct CartFile {
    version: String,
    lines: Vec<CartLine>,
}

/// Ordered cart lines.
#[derive(Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    merge_tolerance: f64,
    events: Arc<EventBus>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            merge_tolerance: DEFAULT_MERGE_TOLERANCE,
            events: EventBus::shared(),
        }
    }

    pub fn with_merge_tolerance(mut self, tolerance: f64) -> Self {
        if tolerance.is_finite() && tolerance >= 0.0 {
            self.merge_tolerance = tolerance;
        }
        self
    }

    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn merge_tolerance(&self) -> f64 {
        self.merge_tolerance
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Lines grouped by color, each group in cart order.
    pub fn lines_by_color(&self) -> BTreeMap<&str, Vec<&CartLine>> {
        let mut grouped: BTreeMap<&str, Vec<&CartLine>> = BTreeMap::new();
        for line in &self.lines {
            grouped.entry(line.color.as_str()).or_default().push(line);
        }
        grouped
    }

    /// First line that an add of this color, size and design would merge into.
    pub fn find_existing_item(&self, color: &str, size: &str, layers: &[Layer]) -> Option<&CartLine> {
        self.lines.iter().find(|l| {
            l.color == color
                && l.size == size
                && designs_equal(&l.design_layers, layers, self.merge_tolerance)
        })
    }

    /// Adds a line or merges it into an equal one.
    pub fn add_line(&mut self, line: NewCartLine) -> AddOutcome {
        if line.quantity == 0 {
            tracing::warn!("Ignoring cart add with zero quantity");
            return AddOutcome::Ignored;
        }

        let tolerance = self.merge_tolerance;
        let existing = self.lines.iter_mut().find(|l| {
            l.color == line.color
                && l.size == line.size
                && designs_equal(&l.design_layers, &line.design_layers, tolerance)
        });

        if let Some(existing) = existing {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            let line_id = existing.id.clone();
            let quantity = existing.quantity;
            tracing::info!("Merged into cart line {}, quantity now {}", line_id, quantity);
            self.publish(CartEvent::LineMerged {
                line_id: line_id.clone(),
                quantity,
            });
            return AddOutcome::Merged { line_id, quantity };
        }

        let line = line.into_line();
        let line_id = line.id.clone();
        tracing::info!(
            "Added cart line {} ({} {} x{}, {} layers)",
            line_id,
            line.color,
            line.size,
            line.quantity,
            line.design_layers.len()
        );
        self.lines.push(line);
        self.publish(CartEvent::LineAdded {
            line_id: line_id.clone(),
        });
        AddOutcome::Added(line_id)
    }

    /// Sets a line's quantity; zero removes the line.
    pub fn update_item_quantity(&mut self, id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(id).is_some();
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        if line.quantity == quantity {
            return false;
        }
        line.quantity = quantity;
        self.publish(CartEvent::QuantityChanged {
            line_id: id.to_string(),
            quantity,
        });
        true
    }

    pub fn remove_item(&mut self, id: &str) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| l.id == id)?;
        let line = self.lines.remove(index);
        self.publish(CartEvent::LineRemoved {
            line_id: line.id.clone(),
        });
        Some(line)
    }

    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        self.publish(CartEvent::Cleared);
    }

    /// Replaces one line's frozen design.
    pub fn update_item_design(&mut self, id: &str, layers: Vec<Layer>) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        line.design_layers = layers;
        tracing::debug!("Cart line {} design replaced", id);
        self.publish(CartEvent::DesignUpdated {
            line_id: id.to_string(),
        });
        true
    }

    /// Opens a scratch store on a line's design.
    pub fn edit_line(&self, id: &str, options: LayerStoreOptions) -> Option<LineEdit> {
        let line = self.line(id)?;
        Some(LineEdit {
            line_id: line.id.clone(),
            store: LayerStore::seeded(&line.color, line.design_layers.clone(), options),
        })
    }

    /// Writes a line edit back into its line. Returns `false` if the line is gone.
    pub fn commit_line_edit(&mut self, edit: LineEdit) -> bool {
        let design = edit.design();
        self.update_item_design(&edit.line_id, design)
    }

    /// Save cart to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = CartFile {
            version: CART_FORMAT_VERSION.to_string(),
            lines: self.lines.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("Failed to serialize cart")?;
        std::fs::write(path.as_ref(), json).context("Failed to write cart file")?;
        tracing::info!("Saved {} cart lines to {}", self.lines.len(), path.as_ref().display());
        Ok(())
    }

    /// Replace the lines with those saved in a file
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read cart file")?;
        let file: CartFile = serde_json::from_str(&content).context("Failed to parse cart file")?;
        self.lines = file.lines;
        tracing::info!("Loaded {} cart lines from {}", self.lines.len(), path.as_ref().display());
        Ok(())
    }

    fn publish(&self, event: CartEvent) {
        self.events.publish(AppEvent::Cart(event));
    }
}
