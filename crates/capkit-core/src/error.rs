//! Error handling for CapKit
//!
//! Provides error types for each layer of the customization flow:
//! - Upload errors (artwork rejected at the input boundary)
//! - Order errors (edit lock, status machine, snapshot saves)
//! - Persistence errors (session and cart files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Upload error type
///
/// Raised by the image input gate before any layer is created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadError {
    /// No bytes were supplied
    #[error("Upload is empty")]
    Empty,

    /// File exceeds the size limit
    #[error("File is {size} bytes, limit is {max} bytes")]
    TooLarge {
        /// Size of the rejected file in bytes.
        size: usize,
        /// Configured limit in bytes.
        max: usize,
    },

    /// Bytes do not look like any known raster format
    #[error("File is not a recognized image")]
    Unrecognized,

    /// Recognized format that the product does not accept
    #[error("Image format {format} is not accepted")]
    UnsupportedFormat {
        /// Detected format name.
        format: String,
    },

    /// Image is smaller than the advisory minimum
    #[error("Image is {width}x{height}px, at least {min_width}x{min_height}px is required")]
    TooSmall {
        /// Detected width in pixels.
        width: u32,
        /// Detected height in pixels.
        height: u32,
        /// Required minimum width.
        min_width: u32,
        /// Required minimum height.
        min_height: u32,
    },

    /// Header could not be decoded
    #[error("Failed to read image: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },
}

/// Order error type
///
/// Represents failures in the order lifecycle and the design edit lock.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// No order with this number exists
    #[error("Order {order_number} not found")]
    NotFound {
        /// The order number that was looked up.
        order_number: String,
    },

    /// The design can no longer be edited
    #[error("Design is locked while the order is {status}")]
    DesignLocked {
        /// Current order status.
        status: String,
    },

    /// Status change not allowed by the order state machine
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// A text layer uses an ink outside the print palette
    #[error("Text layer {layer_id} uses non-printable color {color}")]
    InvalidTextColor {
        /// Offending layer.
        layer_id: String,
        /// Color found on the layer.
        color: String,
    },

    /// Replace request names an item that is not part of the order
    #[error("Order item {item_id} not found")]
    UnknownItem {
        /// The unknown item id.
        item_id: String,
    },

    /// A save for this editing surface is already outstanding
    #[error("A design save is already in progress")]
    SaveInFlight,

    /// Nothing was edited since the last save
    #[error("No design changes to save")]
    NothingToSave,

    /// A save result arrived with no save outstanding
    #[error("No design save is in progress")]
    NoSaveInFlight,

    /// An edit switched the workspace away from the item's color or session
    #[error("Edit left the workspace of order item {item_id} ({color})")]
    WorkspaceChanged {
        /// The item being edited.
        item_id: String,
        /// Color the item's design belongs to.
        color: String,
    },

    /// Backend failure while loading or saving
    #[error("Order repository error: {message}")]
    Repository {
        /// Backend message.
        message: String,
    },
}

impl OrderError {
    /// Create a repository error from a message
    pub fn repository(message: impl Into<String>) -> Self {
        OrderError::Repository {
            message: message.into(),
        }
    }
}

/// Persistence error type
///
/// Represents problems with saved session and cart files.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// File was written by an incompatible version
    #[error("Unsupported file format version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: String,
        /// Version this build writes.
        expected: String,
    },

    /// File parsed but its content is inconsistent
    #[error("Corrupted file: {reason}")]
    Corrupted {
        /// What was wrong.
        reason: String,
    },
}

/// Main error type for CapKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Upload error
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Order error
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an upload rejection
    pub fn is_upload_error(&self) -> bool {
        matches!(self, Error::Upload(_))
    }

    /// Check if this is an order error
    pub fn is_order_error(&self) -> bool {
        matches!(self, Error::Order(_))
    }

    /// Check if this error means the design is read-only
    pub fn is_locked(&self) -> bool {
        matches!(self, Error::Order(OrderError::DesignLocked { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
