//! On-disk record kept next to each stored image.

use serde::{Deserialize, Serialize};

use super::{Dimensions, ImageMetadata};

/// Everything the directory store knows about one image, stored as
/// `<name>.json` beside `<name>.png`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image_name: String,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub metadata: ImageMetadata,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: u64,
}

impl ImageRecord {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}
