//! Fetch an image from a URL and register it with the store.

use serde::{Deserialize, Serialize};

use super::{ImageOutput, Invocation, InvocationContext};
use crate::decode;
use crate::error::ExchangeError;
use crate::http::log_host;
use crate::store::{ImageCategory, ImageMetadata, ResourceOrigin};

/// Load an image from a remote URL and provide it as output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRemoteImage {
    /// Node identifier within the graph.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub is_intermediate: bool,
    /// The URL of the image to get.
    pub image_url: String,
}

impl LoadRemoteImage {
    pub fn new(id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_intermediate: false,
            image_url: image_url.into(),
        }
    }
}

impl Invocation for LoadRemoteImage {
    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<ImageOutput, ExchangeError> {
        let url = self.image_url.as_str();
        tracing::debug!(node = %self.id, host = %log_host(url), "fetching remote image");

        let response = ctx.http.get(url)?;
        let body = match response {
            Some(r) if r.is_success() && !r.body.is_empty() => r.body,
            other => {
                let status = other.map(|r| r.status);
                tracing::warn!(url, ?status, "no usable response");
                return Err(ExchangeError::RetrievalFailed {
                    url: url.to_string(),
                    status,
                });
            }
        };

        let rgb = decode::decode_rgb(&body).map_err(|source| {
            tracing::warn!(url, bytes = body.len(), "decode failed: {}", source);
            ExchangeError::DecodeFailed {
                url: url.to_string(),
                source,
            }
        })?;
        drop(body);

        let meta = ImageMetadata {
            node_id: self.id.clone(),
            session_id: ctx.session_id.clone(),
            is_intermediate: self.is_intermediate,
            origin: ResourceOrigin::Internal,
            category: ImageCategory::General,
        };
        let stored = ctx.store.save(rgb, meta)?;
        tracing::info!(
            image = %stored.image,
            width = stored.width,
            height = stored.height,
            "registered remote image"
        );
        Ok(ImageOutput::from_stored(stored))
    }
}
