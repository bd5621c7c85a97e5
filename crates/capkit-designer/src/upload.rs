//! Artwork input gate.
//!
//! Uploaded files are sniffed and measured before a layer is created. A
//! rejected file never reaches the layer store. Accepted files come back as
//! a base64 data URL usable directly as image layer content.

use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use capkit_core::{NewLayer, UploadError, View};
use image::{ImageFormat, ImageReader};

/// 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_MIN_DIMENSION: u32 = 100;

/// Limits applied by [`validate_upload`].
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub min_width: u32,
    pub min_height: u32,
    pub accepted: Vec<ImageFormat>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            min_width: DEFAULT_MIN_DIMENSION,
            min_height: DEFAULT_MIN_DIMENSION,
            accepted: vec![ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP],
        }
    }
}

impl UploadPolicy {
    /// Accepted formats from extension names such as `png` or `jpeg`.
    ///
    /// Unknown names are skipped with a warning.
    pub fn with_format_names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.accepted = names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref().trim().to_ascii_lowercase();
                let format = ImageFormat::from_extension(&name);
                if format.is_none() {
                    tracing::warn!("Ignoring unknown upload format '{}'", name);
                }
                format
            })
            .collect();
        self
    }

    pub fn accepts(&self, format: ImageFormat) -> bool {
        self.accepted.contains(&format)
    }
}

/// An accepted artwork file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// `data:<mime>;base64,<payload>`.
    pub data_url: String,
}

impl ImageUpload {
    /// Image layer data for `view` using the data URL as content.
    pub fn to_new_layer(&self, view: View) -> NewLayer {
        NewLayer::image(self.data_url.clone(), view)
    }
}

/// Checks size, format and pixel dimensions of an uploaded file.
pub fn validate_upload(bytes: &[u8], policy: &UploadPolicy) -> Result<ImageUpload, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > policy.max_bytes {
        tracing::warn!(
            "Rejected upload of {} bytes (limit {})",
            bytes.len(),
            policy.max_bytes
        );
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            max: policy.max_bytes,
        });
    }

    let format = image::guess_format(bytes).map_err(|_| UploadError::Unrecognized)?;
    if !policy.accepts(format) {
        tracing::warn!("Rejected upload in {:?} format", format);
        return Err(UploadError::UnsupportedFormat {
            format: format_name(format).to_string(),
        });
    }

    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|e| UploadError::Decode {
            reason: e.to_string(),
        })?;

    if width < policy.min_width || height < policy.min_height {
        tracing::warn!("Rejected upload of {}x{}px", width, height);
        return Err(UploadError::TooSmall {
            width,
            height,
            min_width: policy.min_width,
            min_height: policy.min_height,
        });
    }

    let data_url = format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        general_purpose::STANDARD.encode(bytes)
    );
    tracing::debug!("Accepted {}x{} {:?} upload", width, height, format);

    Ok(ImageUpload {
        format,
        width,
        height,
        data_url,
    })
}

fn format_name(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("unknown")
}
