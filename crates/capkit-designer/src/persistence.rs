//! Session files.
//!
//! A session is saved as pretty JSON carrying a format version, session
//! metadata, the active color and view, and every color's layers. Undo
//! history and selection are not saved.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use capkit_core::{AppEvent, DesignEvent, Layer, PersistenceError, View};

use crate::layer_store::{ColorMap, LayerStore};

/// Session file format version
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete session file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    pub version: String,
    pub metadata: SessionMetadata,
    pub selected_color: String,
    #[serde(default)]
    pub current_view: View,
    #[serde(default)]
    pub layers_by_color: ColorMap,
}

/// Session metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub session_id: String,
    pub saved: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl SessionFile {
    /// Capture the persistent part of a store.
    pub fn from_store(store: &LayerStore) -> Self {
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: SessionMetadata {
                session_id: store.session_id.clone(),
                saved: Utc::now(),
                modified: store.last_modified,
            },
            selected_color: store.selected_color.clone(),
            current_view: store.current_view,
            layers_by_color: store.colors.clone(),
        }
    }

    /// Save session to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize session")?;

        std::fs::write(path.as_ref(), json).context("Failed to write session file")?;

        Ok(())
    }

    /// Load session from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read session file")?;

        let session: SessionFile =
            serde_json::from_str(&content).context("Failed to parse session file")?;
        session.check_version()?;

        Ok(session)
    }

    fn check_version(&self) -> std::result::Result<(), PersistenceError> {
        let major = |v: &str| v.split('.').next().unwrap_or_default().to_string();
        if major(&self.version) != major(FILE_FORMAT_VERSION) {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version.clone(),
                expected: FILE_FORMAT_VERSION.to_string(),
            });
        }
        Ok(())
    }
}

/// Load a bare JSON array of layers, as stored on cart lines and order items.
pub fn load_layers_from_file(path: impl AsRef<Path>) -> Result<Vec<Layer>> {
    let content = std::fs::read_to_string(path.as_ref()).context("Failed to read layer file")?;
    let layers = serde_json::from_str(&content).context("Failed to parse layer file")?;
    Ok(layers)
}

impl LayerStore {
    /// Save the session to a file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        SessionFile::from_store(self).save_to_file(&path)?;
        tracing::info!(
            "Saved session {} to {}",
            self.session_id,
            path.as_ref().display()
        );
        Ok(())
    }

    /// Replace this store's state with a saved session.
    ///
    /// History and selection are reset.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let session = SessionFile::load_from_file(&path)?;
        self.restore_session(session);
        tracing::info!(
            "Loaded session {} from {}",
            self.session_id,
            path.as_ref().display()
        );
        Ok(())
    }

    /// Adopt the state held by a session file.
    pub fn restore_session(&mut self, session: SessionFile) {
        self.session_id = session.metadata.session_id;
        self.colors = session.layers_by_color;
        self.selected_color = session.selected_color;
        self.current_view = session.current_view;
        self.selected_layer = None;
        self.last_modified = session.metadata.modified;
        self.clear_history();

        self.event_bus()
            .publish(AppEvent::Design(DesignEvent::SessionReset {
                session_id: self.session_id.clone(),
            }));
    }
}
