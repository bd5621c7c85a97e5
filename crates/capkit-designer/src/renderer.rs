//! Canvas renderer.
//!
//! Builds a backend-neutral [`Scene`] for one (color, view): the product
//! base image, the print-area guide, the view's layers and, in interactive
//! mode, the selection controls. The same scene feeds the editor, cart
//! review and order review, so identical layers land on identical pixels
//! everywhere. [`Scene::hit_test`] maps pointer positions back to targets.

use capkit_core::{Layer, LayerId, LayerKind, ProductCatalog, View};

use crate::print_area::PrintAreas;
use crate::transform::ResizeHandle;
use crate::viewport::{CanvasScale, PixelPoint, PixelRect};

/// Fill used for text layers without a color.
pub const DEFAULT_TEXT_COLOR: &str = "#000";

/// Caption drawn on the print-area guide.
pub const PRINT_AREA_LABEL: &str = "PRINT AREA";

/// Whether the rendered canvas accepts edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Interactive,
    ReadOnly,
}

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub show_print_area: bool,
    pub show_view_label: bool,
    /// Colors whose right view has its own photo and is drawn unmirrored.
    pub mirror_exempt_colors: Vec<String>,
    /// Radius of resize and remove controls in pixels.
    pub handle_radius: f64,
    /// Distance of the rotate handle above the layer's top edge in pixels.
    pub rotate_handle_offset: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Interactive,
            show_print_area: true,
            show_view_label: false,
            mirror_exempt_colors: vec!["black".to_string()],
            handle_radius: 6.0,
            rotate_handle_offset: 24.0,
        }
    }
}

impl RenderOptions {
    pub fn read_only() -> Self {
        Self {
            mode: RenderMode::ReadOnly,
            ..Self::default()
        }
    }
}

/// What a layer sprite draws.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteContent {
    Image {
        source: String,
    },
    Text {
        text: String,
        color: String,
        font_size: f64,
        font_family: Option<String>,
    },
}

/// One placed layer in pixels.
///
/// The box is drawn at `rect`, then rotated about its center, then scaled
/// by `scale_x`/`scale_y` (`-1` for a flip).
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSprite {
    pub layer_id: LayerId,
    pub rect: PixelRect,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub content: SpriteContent,
    pub selected: bool,
}

/// Controls around the selected layer, in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHandles {
    pub layer_id: LayerId,
    pub rect: PixelRect,
    pub rotation: f64,
    pub resize: Vec<(ResizeHandle, PixelPoint)>,
    pub rotate: PixelPoint,
    pub remove: PixelPoint,
    pub radius: f64,
}

/// A single drawing instruction, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BaseImage {
        source: String,
        rect: PixelRect,
        mirrored: bool,
    },
    PrintArea {
        rect: PixelRect,
        label: &'static str,
    },
    Layer(LayerSprite),
    Handles(SelectionHandles),
    ViewLabel {
        text: String,
        at: PixelPoint,
    },
}

/// What lies under a pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Remove(LayerId),
    Rotate(LayerId),
    Resize(LayerId, ResizeHandle),
    Body(LayerId),
    Background,
}

/// Everything needed to draw one canvas.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub color: &'a str,
    pub view: View,
    /// Layers of the color; only those on `view` are drawn.
    pub layers: &'a [&'a Layer],
    pub selected: Option<&'a LayerId>,
    pub catalog: &'a ProductCatalog,
    pub areas: &'a PrintAreas,
}

/// Paint list for one canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub size: f64,
    pub mode: RenderMode,
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn sprites(&self) -> impl Iterator<Item = &LayerSprite> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Layer(sprite) => Some(sprite),
            _ => None,
        })
    }

    pub fn handles(&self) -> Option<&SelectionHandles> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Handles(handles) => Some(handles),
            _ => None,
        })
    }

    /// Topmost target under `point`. Read-only scenes only report bodies.
    pub fn hit_test(&self, point: PixelPoint) -> HitTarget {
        if let Some(handles) = self.handles() {
            if within(point, handles.remove, handles.radius) {
                return HitTarget::Remove(handles.layer_id.clone());
            }
            if within(point, handles.rotate, handles.radius) {
                return HitTarget::Rotate(handles.layer_id.clone());
            }
            for (handle, at) in &handles.resize {
                if within(point, *at, handles.radius) {
                    return HitTarget::Resize(handles.layer_id.clone(), *handle);
                }
            }
        }

        let sprites: Vec<&LayerSprite> = self.sprites().collect();
        for sprite in sprites.into_iter().rev() {
            if sprite_contains(sprite, point) {
                return HitTarget::Body(sprite.layer_id.clone());
            }
        }
        HitTarget::Background
    }
}

/// Turns design state into [`Scene`]s.
#[derive(Debug, Clone, Default)]
pub struct CanvasRenderer {
    options: RenderOptions,
}

impl CanvasRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn mode(&self) -> RenderMode {
        self.options.mode
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.options.mode = mode;
    }

    /// Whether the right view of `color` is drawn mirrored.
    pub fn is_mirrored(&self, color: &str, view: View) -> bool {
        view == View::Right && !self.options.mirror_exempt_colors.iter().any(|c| c == color)
    }

    pub fn render(&self, scale: &CanvasScale, input: &RenderInput<'_>) -> Scene {
        let size = scale.size();
        let mut commands = Vec::new();

        match input.catalog.base_image(input.color, input.view) {
            Some(source) => commands.push(DrawCommand::BaseImage {
                source: source.to_string(),
                rect: PixelRect::new(0.0, 0.0, size, size),
                mirrored: self.is_mirrored(input.color, input.view),
            }),
            None => tracing::debug!(
                "No base image for {} {}, rendering layers only",
                input.color,
                input.view
            ),
        }

        if self.options.show_print_area {
            if let Some(zone) = input.areas.zone(input.view) {
                commands.push(DrawCommand::PrintArea {
                    rect: scale.frame_to_pixels(&zone),
                    label: PRINT_AREA_LABEL,
                });
            }
        }

        if self.options.show_view_label {
            commands.push(DrawCommand::ViewLabel {
                text: input.view.as_str().to_uppercase(),
                at: PixelPoint::new(8.0, 8.0),
            });
        }

        let interactive = self.options.mode == RenderMode::Interactive;
        let mut selected_sprite = None;
        for layer in input.layers.iter().filter(|l| l.view == input.view) {
            let selected = interactive && input.selected == Some(&layer.id);
            let sprite = sprite_for(layer, scale, selected);
            if selected {
                selected_sprite = Some(sprite.clone());
            }
            commands.push(DrawCommand::Layer(sprite));
        }

        if let Some(sprite) = selected_sprite {
            commands.push(DrawCommand::Handles(self.handles_for(&sprite)));
        }

        Scene {
            size,
            mode: self.options.mode,
            commands,
        }
    }

    fn handles_for(&self, sprite: &LayerSprite) -> SelectionHandles {
        let rect = sprite.rect;
        let center = rect.center();
        let place = |fx: f64, fy: f64, extra_y: f64| {
            let local_x = (fx - 0.5) * rect.width;
            let local_y = (fy - 0.5) * rect.height + extra_y;
            rotate_about(center, local_x, local_y, sprite.rotation)
        };

        SelectionHandles {
            layer_id: sprite.layer_id.clone(),
            rect,
            rotation: sprite.rotation,
            resize: ResizeHandle::ALL
                .iter()
                .map(|handle| {
                    let (fx, fy) = handle.anchor();
                    (*handle, place(fx, fy, 0.0))
                })
                .collect(),
            rotate: place(0.5, 0.0, -self.options.rotate_handle_offset),
            remove: place(1.0, 0.0, -self.options.handle_radius * 2.0),
            radius: self.options.handle_radius,
        }
    }
}

fn sprite_for(layer: &Layer, scale: &CanvasScale, selected: bool) -> LayerSprite {
    let content = match &layer.kind {
        LayerKind::Image { source } => SpriteContent::Image {
            source: source.clone(),
        },
        LayerKind::Text(text) => SpriteContent::Text {
            text: text.text.clone(),
            color: text
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            font_size: text.font_size,
            font_family: text.font_family.clone(),
        },
    };

    LayerSprite {
        layer_id: layer.id.clone(),
        rect: scale.frame_to_pixels(&layer.frame()),
        rotation: layer.rotation,
        scale_x: if layer.flip_x { -1.0 } else { 1.0 },
        scale_y: if layer.flip_y { -1.0 } else { 1.0 },
        content,
        selected,
    }
}

/// Map a layer-local offset from `center` to screen space.
fn rotate_about(center: PixelPoint, local_x: f64, local_y: f64, rotation: f64) -> PixelPoint {
    let (sin, cos) = rotation.to_radians().sin_cos();
    PixelPoint::new(
        center.x + local_x * cos - local_y * sin,
        center.y + local_x * sin + local_y * cos,
    )
}

fn within(point: PixelPoint, at: PixelPoint, radius: f64) -> bool {
    let (dx, dy) = point.delta_from(at);
    dx * dx + dy * dy <= radius * radius
}

fn sprite_contains(sprite: &LayerSprite, point: PixelPoint) -> bool {
    let center = sprite.rect.center();
    let (dx, dy) = point.delta_from(center);
    let (sin, cos) = sprite.rotation.to_radians().sin_cos();
    // inverse rotation into the sprite's frame
    let local_x = dx * cos + dy * sin;
    let local_y = -dx * sin + dy * cos;
    local_x.abs() <= sprite.rect.width / 2.0 && local_y.abs() <= sprite.rect.height / 2.0
}
