//! Design layers.
//!
//! A layer is a single image or text element placed on one view of one color.
//! Geometry is stored as percentages of the square canvas so the same numbers
//! render identically at any on-screen size.
//!
//! The wire shape is flat camelCase JSON:
//!
//! ```text
//! {id, kind:"image"|"text", content, x, y, width, height,
//!  rotation, flipX, flipY, view, color?, fontSize?, fontFamily?}
//! ```
//!
//! Older snapshots may omit `rotation`, `flipX`, `flipY` or `fontSize`, or use
//! `type` instead of `kind`; those load with defaults instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::view::View;

/// Font size given to text layers that do not carry one.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Width/height (percent) given to layers added without a size.
pub const DEFAULT_LAYER_EXTENT: f64 = 100.0;

/// Identifier of a layer, unique within its color's collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
///
/// Non-finite input collapses to `0`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Axis-aligned rectangle in percent space, before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayerFrame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width divided by height, `1.0` for degenerate rectangles.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// Text payload and styling of a text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    /// Literal text to print.
    pub text: String,
    /// Fill color as a hex string, renderer default when absent.
    pub color: Option<String>,
    /// Font size, kept within the configured clamp by resize gestures.
    pub font_size: f64,
    /// CSS-style font family name.
    pub font_family: Option<String>,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            font_size: DEFAULT_FONT_SIZE,
            font_family: None,
        }
    }
}

/// What a layer draws.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Raster artwork referenced by URL or inline data URL.
    Image { source: String },
    /// Styled text.
    Text(TextContent),
}

/// Discriminant of [`LayerKind`] as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKindTag {
    Image,
    Text,
}

impl fmt::Display for LayerKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKindTag::Image => write!(f, "image"),
            LayerKindTag::Text => write!(f, "text"),
        }
    }
}

/// A single placed element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayerRecord", into = "LayerRecord")]
pub struct Layer {
    pub id: LayerId,
    pub kind: LayerKind,
    pub view: View,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Layer {
    /// Image source or literal text.
    pub fn content(&self) -> &str {
        match &self.kind {
            LayerKind::Image { source } => source,
            LayerKind::Text(text) => &text.text,
        }
    }

    pub fn kind_tag(&self) -> LayerKindTag {
        match self.kind {
            LayerKind::Image { .. } => LayerKindTag::Image,
            LayerKind::Text(_) => LayerKindTag::Text,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, LayerKind::Image { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, LayerKind::Text(_))
    }

    /// Text payload for text layers.
    pub fn text(&self) -> Option<&TextContent> {
        match &self.kind {
            LayerKind::Text(text) => Some(text),
            LayerKind::Image { .. } => None,
        }
    }

    pub fn frame(&self) -> LayerFrame {
        LayerFrame::new(self.x, self.y, self.width, self.height)
    }

    /// Copy of this layer under a new id.
    pub fn duplicate(&self) -> Layer {
        Layer {
            id: LayerId::generate(),
            ..self.clone()
        }
    }

    /// Merge a partial update into this layer.
    ///
    /// Non-finite numbers and non-positive sizes are skipped, rotation is
    /// normalized, and text styling is ignored on image layers. Returns
    /// `true` when any field changed.
    pub fn apply(&mut self, patch: &LayerPatch) -> bool {
        let before = self.clone();

        if let Some(content) = &patch.content {
            match &mut self.kind {
                LayerKind::Image { source } => source.clone_from(content),
                LayerKind::Text(text) => text.text.clone_from(content),
            }
        }
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            self.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            self.y = y;
        }
        if let Some(width) = patch.width.filter(|v| v.is_finite() && *v > 0.0) {
            self.width = width;
        }
        if let Some(height) = patch.height.filter(|v| v.is_finite() && *v > 0.0) {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = normalize_rotation(rotation);
        }
        if let Some(flip_x) = patch.flip_x {
            self.flip_x = flip_x;
        }
        if let Some(flip_y) = patch.flip_y {
            self.flip_y = flip_y;
        }

        match &mut self.kind {
            LayerKind::Text(text) => {
                if let Some(color) = &patch.color {
                    text.color = Some(color.clone());
                }
                if let Some(size) = patch.font_size.filter(|v| v.is_finite() && *v > 0.0) {
                    text.font_size = size;
                }
                if let Some(family) = &patch.font_family {
                    text.font_family = Some(family.clone());
                }
            }
            LayerKind::Image { .. } => {
                if patch.has_text_style() {
                    tracing::debug!("Ignoring text styling for image layer {}", self.id);
                }
            }
        }

        *self != before
    }
}

/// Partial update for [`Layer::apply`].
///
/// There is no `view` field. Moving a layer between views or colors means
/// copying it under a new id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerPatch {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub flip_x: Option<bool>,
    pub flip_y: Option<bool>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
}

impl LayerPatch {
    /// Patch moving the layer to `(x, y)`.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    /// Patch replacing position and size at once.
    pub fn frame(frame: LayerFrame) -> Self {
        Self {
            x: Some(frame.x),
            y: Some(frame.y),
            width: Some(frame.width),
            height: Some(frame.height),
            ..Default::default()
        }
    }

    /// Patch setting an absolute rotation.
    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == LayerPatch::default()
    }

    fn has_text_style(&self) -> bool {
        self.color.is_some() || self.font_size.is_some() || self.font_family.is_some()
    }
}

/// Data for a layer that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLayer {
    pub kind: LayerKind,
    pub view: View,
    pub x: f64,
    pub y: f64,
    /// `None` or non-positive means [`DEFAULT_LAYER_EXTENT`].
    pub width: Option<f64>,
    /// `None` or non-positive means [`DEFAULT_LAYER_EXTENT`].
    pub height: Option<f64>,
    pub rotation: f64,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl NewLayer {
    /// Image layer at the origin with default size.
    pub fn image(source: impl Into<String>, view: View) -> Self {
        Self::with_kind(
            LayerKind::Image {
                source: source.into(),
            },
            view,
        )
    }

    /// Text layer at the origin with default size and font.
    pub fn text(text: impl Into<String>, view: View) -> Self {
        Self::with_kind(LayerKind::Text(TextContent::new(text)), view)
    }

    fn with_kind(kind: LayerKind, view: View) -> Self {
        Self {
            kind,
            view,
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Position and size from a frame.
    pub fn placed(self, frame: LayerFrame) -> Self {
        self.at(frame.x, frame.y).sized(frame.width, frame.height)
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn flipped(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    /// Set text color, font size and family; no effect on image layers.
    pub fn styled(
        mut self,
        color: Option<String>,
        font_size: Option<f64>,
        font_family: Option<String>,
    ) -> Self {
        if let LayerKind::Text(text) = &mut self.kind {
            text.color = color;
            if let Some(size) = font_size.filter(|v| v.is_finite() && *v > 0.0) {
                text.font_size = size;
            }
            text.font_family = font_family;
        }
        self
    }

    /// Materialize the layer, applying size and rotation defaults.
    pub fn into_layer(self, id: LayerId) -> Layer {
        Layer {
            id,
            kind: self.kind,
            view: self.view,
            x: self.x,
            y: self.y,
            width: extent_or_default(self.width),
            height: extent_or_default(self.height),
            rotation: normalize_rotation(self.rotation),
            flip_x: self.flip_x,
            flip_y: self.flip_y,
        }
    }
}

fn extent_or_default(value: Option<f64>) -> f64 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(DEFAULT_LAYER_EXTENT)
}

/// Flat wire representation of a [`Layer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerRecord {
    #[serde(default = "LayerId::generate")]
    id: LayerId,
    #[serde(alias = "type")]
    kind: LayerKindTag,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    rotation: Option<f64>,
    #[serde(default)]
    flip_x: Option<bool>,
    #[serde(default)]
    flip_y: Option<bool>,
    #[serde(default)]
    view: Option<View>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_family: Option<String>,
}

impl From<LayerRecord> for Layer {
    fn from(record: LayerRecord) -> Self {
        let content = record.content.unwrap_or_default();
        let kind = match record.kind {
            LayerKindTag::Image => LayerKind::Image { source: content },
            LayerKindTag::Text => LayerKind::Text(TextContent {
                text: content,
                color: record.color,
                font_size: record
                    .font_size
                    .filter(|v| v.is_finite() && *v > 0.0)
                    .unwrap_or(DEFAULT_FONT_SIZE),
                font_family: record.font_family,
            }),
        };

        Layer {
            id: record.id,
            kind,
            view: record.view.unwrap_or_default(),
            x: record.x.filter(|v| v.is_finite()).unwrap_or(0.0),
            y: record.y.filter(|v| v.is_finite()).unwrap_or(0.0),
            width: extent_or_default(record.width),
            height: extent_or_default(record.height),
            rotation: normalize_rotation(record.rotation.unwrap_or(0.0)),
            flip_x: record.flip_x.unwrap_or(false),
            flip_y: record.flip_y.unwrap_or(false),
        }
    }
}

impl From<Layer> for LayerRecord {
    fn from(layer: Layer) -> Self {
        let (kind, content, color, font_size, font_family) = match layer.kind {
            LayerKind::Image { source } => (LayerKindTag::Image, source, None, None, None),
            LayerKind::Text(text) => (
                LayerKindTag::Text,
                text.text,
                text.color,
                Some(text.font_size),
                text.font_family,
            ),
        };

        LayerRecord {
            id: layer.id,
            kind,
            content: Some(content),
            x: Some(layer.x),
            y: Some(layer.y),
            width: Some(layer.width),
            height: Some(layer.height),
            rotation: Some(layer.rotation),
            flip_x: Some(layer.flip_x),
            flip_y: Some(layer.flip_y),
            view: Some(layer.view),
            color,
            font_size,
            font_family,
        }
    }
}
