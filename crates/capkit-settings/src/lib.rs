//! CapKit Settings Crate
//!
//! Configuration file model for the studio: canvas, transform, layer, cart,
//! upload, render and storage sections, loaded from JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    CanvasSettings, CartSettings, Config, LayerSettings, RenderSettings, StorageSettings,
    TransformConfig, UploadSettings, CONFIG_FILE_NAME,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
