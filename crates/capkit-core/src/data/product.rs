//! Read-only product tables consumed by the canvas.
//!
//! The catalog service owns these; the canvas only looks things up. A
//! product supplies one base image per (color, view) and a list of
//! customizable areas, each either shared by every color (`color_id` is
//! `None`) or specific to one color.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::layer::LayerFrame;
use super::view::View;

/// Advisory print rectangle in percent space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "enabled_by_default")]
    pub is_enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl PrintRect {
    /// Enabled rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            is_enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }

    pub fn frame(&self) -> LayerFrame {
        LayerFrame::new(self.x, self.y, self.width, self.height)
    }
}

/// One colorway of the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductColor {
    pub id: String,
    pub label: String,
    pub hex: String,
    /// Base image reference per view; missing entries render without a base.
    #[serde(default)]
    pub views: HashMap<View, String>,
}

impl ProductColor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            hex: hex.into(),
            views: HashMap::new(),
        }
    }

    pub fn with_view(mut self, view: View, image: impl Into<String>) -> Self {
        self.views.insert(view, image.into());
        self
    }
}

/// A print zone declared by the product for one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizableArea {
    pub view: View,
    /// `None` applies to every color.
    #[serde(default)]
    pub color_id: Option<String>,
    #[serde(flatten)]
    pub rect: PrintRect,
}

impl CustomizableArea {
    /// Zone shared by all colors.
    pub fn common(view: View, rect: PrintRect) -> Self {
        Self {
            view,
            color_id: None,
            rect,
        }
    }

    /// Zone overriding the common one for a single color.
    pub fn for_color(view: View, color_id: impl Into<String>, rect: PrintRect) -> Self {
        Self {
            view,
            color_id: Some(color_id.into()),
            rect,
        }
    }
}

/// Image and zone lookup tables for one product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCatalog {
    pub colors: Vec<ProductColor>,
    #[serde(default)]
    pub areas: Vec<CustomizableArea>,
}

impl ProductCatalog {
    pub fn new(colors: Vec<ProductColor>, areas: Vec<CustomizableArea>) -> Self {
        Self { colors, areas }
    }

    pub fn color(&self, color_id: &str) -> Option<&ProductColor> {
        self.colors.iter().find(|c| c.id == color_id)
    }

    /// Display label of a color, falling back to its id.
    pub fn color_label<'a>(&'a self, color_id: &'a str) -> &'a str {
        self.color(color_id)
            .map(|c| c.label.as_str())
            .unwrap_or(color_id)
    }

    /// Base image for a (color, view) pair, if the product has one.
    pub fn base_image(&self, color_id: &str, view: View) -> Option<&str> {
        self.color(color_id)
            .and_then(|c| c.views.get(&view))
            .map(String::as_str)
            .filter(|src| !src.is_empty())
    }

    /// The stock five-view cap in four colorways with the studio zones.
    ///
    /// Only black ships distinct left and right photos; the other colors
    /// reuse one side shot, which the renderer mirrors for the right view.
    pub fn default_cap() -> Self {
        let mut colors = vec![ProductColor::new("black", "Midnight Black", "#000000")];
        for view in View::ALL {
            colors[0]
                .views
                .insert(view, format!("/assets/hats/black-{}.png", view));
        }

        colors.extend(
            [
                ("khaki", "Desert Khaki", "#C3B091"),
                ("beige", "Sand Beige", "#F5F5DC"),
                ("red", "Race Red", "#FF0000"),
            ]
            .into_iter()
            .map(|(id, label, hex)| {
                ProductColor::new(id, label, hex)
                    .with_view(View::Front, format!("/assets/hats/{}.png", id))
                    .with_view(View::Left, format!("/assets/hats/{}-side.png", id))
                    .with_view(View::Right, format!("/assets/hats/{}-side.png", id))
                    .with_view(View::Back, format!("/assets/hats/{}-back.png", id))
                    .with_view(View::Top, format!("/assets/hats/{}-top.png", id))
            }),
        );

        Self::new(colors, default_areas())
    }
}

/// Studio zones used when a product declares none.
pub fn default_areas() -> Vec<CustomizableArea> {
    vec![
        CustomizableArea::common(View::Front, PrintRect::new(30.0, 30.0, 40.0, 30.0)),
        CustomizableArea::common(View::Left, PrintRect::new(30.0, 40.0, 40.0, 20.0)),
        CustomizableArea::common(View::Right, PrintRect::new(30.0, 40.0, 40.0, 20.0)),
        CustomizableArea::common(View::Back, PrintRect::new(30.0, 40.0, 40.0, 20.0)),
        CustomizableArea::common(View::Top, PrintRect::new(25.0, 25.0, 50.0, 50.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_image_lookup() {
        let catalog = ProductCatalog::default_cap();
        assert_eq!(
            catalog.base_image("khaki", View::Back),
            Some("/assets/hats/khaki-back.png")
        );
        assert_eq!(catalog.base_image("purple", View::Front), None);
        assert_eq!(catalog.color_label("red"), "Race Red");
        assert_eq!(catalog.color_label("purple"), "purple");
    }

    #[test]
    fn test_empty_image_reference_counts_as_missing() {
        let catalog = ProductCatalog::new(
            vec![ProductColor::new("black", "Black", "#000").with_view(View::Front, "")],
            Vec::new(),
        );
        assert_eq!(catalog.base_image("black", View::Front), None);
    }

    #[test]
    fn test_area_wire_shape() {
        let json = r#"{"view":"front","colorId":"red","x":10,"y":12,"width":50,"height":40}"#;
        let area: CustomizableArea = serde_json::from_str(json).unwrap();
        assert_eq!(area.color_id.as_deref(), Some("red"));
        assert!(area.rect.is_enabled);
        assert_eq!(area.rect.frame(), LayerFrame::new(10.0, 12.0, 50.0, 40.0));
    }
}
