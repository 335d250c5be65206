//! Image uploads handed to the inference gateway.

use crate::constants::upload::IMAGE_TYPES;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// An image read into memory, ready to send upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Where the image came from.
    pub path: PathBuf,
    /// MIME type, always `image/*`.
    pub mime_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read an image from disk.
    ///
    /// The MIME type is derived from the file extension. Non-image files
    /// are rejected before reading, empty files after.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mime_type = mime_type_for(path).ok_or_else(|| Error::UnsupportedMediaType {
            path: path.to_path_buf(),
        })?;

        let bytes = std::fs::read(path).map_err(|e| Error::ImageRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_bytes(path, mime_type, bytes)
    }

    /// Wrap bytes already in memory.
    pub fn from_bytes(path: &Path, mime_type: &str, bytes: Vec<u8>) -> Result<Self> {
        if !mime_type.starts_with("image/") {
            return Err(Error::UnsupportedMediaType {
                path: path.to_path_buf(),
            });
        }
        if bytes.is_empty() {
            return Err(Error::EmptyUpload {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            mime_type: mime_type.to_string(),
            bytes,
        })
    }
}

/// MIME type for a file, judged by its extension.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?;
    IMAGE_TYPES
        .iter()
        .find(|(candidate, _)| ext.eq_ignore_ascii_case(candidate))
        .map(|(_, mime)| *mime)
}

/// Check if a file has a supported image extension.
pub fn is_image_file(path: &Path) -> bool {
    mime_type_for(path).is_some()
}
