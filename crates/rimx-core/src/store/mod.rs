//! Image store capability.
//!
//! The host owns image persistence. Operations only reach it through
//! [`ImageStore`]: register a decoded image, resolve a reference to a file
//! path, and look up dimensions. [`DirStore`] is a directory-backed
//! implementation used by the CLI and tests.

mod dir;
mod record;

pub use dir::DirStore;
pub use record::ImageRecord;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Opaque store-assigned identifier for a registered image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    pub image_name: String,
}

impl ImageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            image_name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.image_name
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.image_name)
    }
}

/// Pixel dimensions of a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Where an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceOrigin {
    /// Produced inside the host (including images fetched by an invocation).
    #[default]
    Internal,
    /// Supplied from outside, e.g. uploaded by a user.
    External,
}

/// Classification of a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    #[default]
    General,
    Mask,
    Control,
    User,
    Other,
}

/// Tags attached to an image when it is registered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Identifier of the node that produced the image.
    pub node_id: String,
    /// Graph execution session that owns the image.
    pub session_id: String,
    pub is_intermediate: bool,
    pub origin: ResourceOrigin,
    pub category: ImageCategory,
}

/// Result of [`ImageStore::save`]: the new reference and its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub image: ImageRef,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("store I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode image for storage")]
    Encode(#[from] image::ImageError),

    #[error("corrupt image record for {name}")]
    Record {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Capability interface the operations need from the host's image store.
///
/// Implementations must tolerate concurrent calls from independent
/// invocations.
pub trait ImageStore: Send + Sync {
    /// Register a decoded image and return its reference and dimensions.
    fn save(&self, image: RgbImage, meta: ImageMetadata) -> Result<StoredImage, StoreError>;

    /// Filesystem path holding the encoded bytes of `image`.
    fn resolve_path(&self, image: &ImageRef) -> Result<PathBuf, StoreError>;

    /// Dimensions of `image`, without decoding its pixels.
    fn describe(&self, image: &ImageRef) -> Result<Dimensions, StoreError>;
}
