//! Configuration and settings management for CapKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Canvas sizing before the first measurement
//! - Transform limits (drag bounds, rotation snap, font and size clamps)
//! - Layer defaults (color, view, placement, history depth)
//! - Cart merge tolerance and product identity
//! - Upload limits and accepted formats
//! - Render options for the editor and previews
//! - Storage locations for sessions, carts and previews

use capkit_core::View;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// File name used inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Canvas settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Edge length in pixels assumed until the canvas is measured
    pub initial_size: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self { initial_size: 500.0 }
    }
}

/// Gesture limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Keep dragged layers fully on the canvas
    pub bound_drag_to_canvas: bool,
    /// Rotation snap increment in degrees
    pub rotation_snap: f64,
    /// Smallest font size a text resize may reach
    pub min_font_size: f64,
    /// Largest font size a text resize may reach
    pub max_font_size: f64,
    /// Smallest layer width or height in percent
    pub min_layer_size: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            bound_drag_to_canvas: true,
            rotation_snap: 15.0,
            min_font_size: 8.0,
            max_font_size: 120.0,
            min_layer_size: 1.0,
        }
    }
}

/// Layer store defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    /// Color active when a session starts
    pub default_color: String,
    /// View shown when a session starts
    pub default_view: View,
    /// Width and height in percent of a newly placed layer
    pub default_placed_size: f64,
    /// Font size of new text layers
    pub default_font_size: f64,
    /// Undo steps kept per session
    pub history_depth: usize,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            default_color: "black".to_string(),
            default_view: View::Front,
            default_placed_size: 15.0,
            default_font_size: 24.0,
            history_depth: 30,
        }
    }
}

/// Cart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartSettings {
    /// Largest x/y difference in percent at which two designs still merge
    pub merge_tolerance: f64,
    pub product_id: String,
    pub product_name: String,
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            merge_tolerance: 1.0,
            product_id: "custom-hat".to_string(),
            product_name: "Custom Cap".to_string(),
        }
    }
}

/// Upload gate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Largest accepted file in bytes
    pub max_bytes: usize,
    /// Smallest accepted pixel width
    pub min_width: u32,
    /// Smallest accepted pixel height
    pub min_height: u32,
    /// Accepted formats by extension name
    pub accepted_formats: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            min_width: 100,
            min_height: 100,
            accepted_formats: vec!["png".to_string(), "jpeg".to_string(), "webp".to_string()],
        }
    }
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Draw the advisory print area in the editor
    pub show_print_area: bool,
    /// Draw the view name in previews
    pub show_view_label: bool,
    /// Colors with their own right-side photo, drawn unmirrored
    pub mirror_exempt_colors: Vec<String>,
    /// Radius of resize and remove controls in pixels
    pub handle_radius: f64,
    /// Distance of the rotate handle above a layer in pixels
    pub rotate_handle_offset: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_print_area: true,
            show_view_label: false,
            mirror_exempt_colors: vec!["black".to_string()],
            handle_radius: 6.0,
            rotate_handle_offset: 24.0,
        }
    }
}

/// Storage locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the working session is saved
    pub session_file: Option<PathBuf>,
    /// Where the cart is saved
    pub cart_file: Option<PathBuf>,
    /// Default directory for SVG previews
    pub preview_directory: PathBuf,
    /// Number of recent sessions to track
    pub recent_sessions_count: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            session_file: None,
            cart_file: None,
            preview_directory: PathBuf::from("previews"),
            recent_sessions_count: 10,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasSettings,
    pub transform: TransformConfig,
    pub layers: LayerSettings,
    pub cart: CartSettings,
    pub upload: UploadSettings,
    pub render: RenderSettings,
    pub storage: StorageSettings,
    /// Recently opened session files, newest first
    pub recent_sessions: Vec<PathBuf>,
}

#[derive(Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or_default().to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/capkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(dir.join("capkit").join(CONFIG_FILE_NAME))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the file at [`default_path`](Self::default_path), or defaults if absent
    pub fn load_or_default() -> SettingsResult<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.canvas.initial_size.is_finite() && self.canvas.initial_size > 0.0) {
            return Err(ConfigError::out_of_range(
                "canvas.initial_size",
                self.canvas.initial_size,
            ));
        }

        let t = &self.transform;
        if !(t.rotation_snap.is_finite() && t.rotation_snap > 0.0 && t.rotation_snap <= 360.0) {
            return Err(ConfigError::out_of_range(
                "transform.rotation_snap",
                t.rotation_snap,
            ));
        }
        if !(t.min_font_size.is_finite() && t.min_font_size > 0.0) {
            return Err(ConfigError::out_of_range(
                "transform.min_font_size",
                t.min_font_size,
            ));
        }
        if !t.max_font_size.is_finite() {
            return Err(ConfigError::out_of_range(
                "transform.max_font_size",
                t.max_font_size,
            ));
        }
        if t.max_font_size < t.min_font_size {
            return Err(ConfigError::Inconsistent(format!(
                "transform.max_font_size {} is below min_font_size {}",
                t.max_font_size, t.min_font_size
            )));
        }
        if !(t.min_layer_size.is_finite() && t.min_layer_size > 0.0 && t.min_layer_size <= 100.0) {
            return Err(ConfigError::out_of_range(
                "transform.min_layer_size",
                t.min_layer_size,
            ));
        }

        let l = &self.layers;
        if l.default_color.trim().is_empty() {
            return Err(ConfigError::MissingKey("layers.default_color".to_string()));
        }
        if !(l.default_placed_size.is_finite()
            && l.default_placed_size > 0.0
            && l.default_placed_size <= 100.0)
        {
            return Err(ConfigError::out_of_range(
                "layers.default_placed_size",
                l.default_placed_size,
            ));
        }
        if !(l.default_font_size >= t.min_font_size && l.default_font_size <= t.max_font_size) {
            return Err(ConfigError::out_of_range(
                "layers.default_font_size",
                l.default_font_size,
            ));
        }
        if l.history_depth == 0 {
            return Err(ConfigError::out_of_range("layers.history_depth", 0));
        }

        if !(self.cart.merge_tolerance >= 0.0 && self.cart.merge_tolerance.is_finite()) {
            return Err(ConfigError::out_of_range(
                "cart.merge_tolerance",
                self.cart.merge_tolerance,
            ));
        }
        if self.cart.product_id.trim().is_empty() {
            return Err(ConfigError::MissingKey("cart.product_id".to_string()));
        }

        if self.upload.max_bytes == 0 {
            return Err(ConfigError::out_of_range("upload.max_bytes", 0));
        }
        if self.upload.accepted_formats.is_empty() {
            return Err(ConfigError::MissingKey(
                "upload.accepted_formats".to_string(),
            ));
        }

        if !(self.render.handle_radius.is_finite() && self.render.handle_radius > 0.0) {
            return Err(ConfigError::out_of_range(
                "render.handle_radius",
                self.render.handle_radius,
            ));
        }
        if !self.render.rotate_handle_offset.is_finite() {
            return Err(ConfigError::out_of_range(
                "render.rotate_handle_offset",
                self.render.rotate_handle_offset,
            ));
        }

        Ok(())
    }

    /// Add a session file to the recent list
    pub fn add_recent_session(&mut self, path: PathBuf) {
        self.recent_sessions.retain(|p| p != &path);
        self.recent_sessions.insert(0, path);
        self.recent_sessions
            .truncate(self.storage.recent_sessions_count);
    }
}
