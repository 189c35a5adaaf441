//! Upload a stored image to a remote endpoint.

use serde::{Deserialize, Serialize};

use super::{ImageOutput, Invocation, InvocationContext};
use crate::error::ExchangeError;
use crate::http::{log_host, UploadPart};
use crate::store::ImageRef;

/// Form field carrying the image bytes.
pub const UPLOAD_FIELD: &str = "image";

/// Endpoint status codes treated as success.
pub const ACCEPTED_STATUS: [u32; 2] = [200, 201];

/// Post an image to a remote HTTP endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImageToRemote {
    #[serde(default)]
    pub id: String,
    /// The image to post.
    pub image: ImageRef,
    /// The endpoint URL to post the image to.
    pub endpoint: String,
}

impl PostImageToRemote {
    pub fn new(id: impl Into<String>, image: ImageRef, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image,
            endpoint: endpoint.into(),
        }
    }
}

impl Invocation for PostImageToRemote {
    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<ImageOutput, ExchangeError> {
        let endpoint = self.endpoint.as_str();
        let path = ctx.store.resolve_path(&self.image)?;
        let part = UploadPart::from_file(UPLOAD_FIELD, &path, &ctx.content_type)?;
        tracing::debug!(
            node = %self.id,
            image = %self.image,
            host = %log_host(endpoint),
            bytes = part.data.len(),
            "posting image"
        );

        let response = ctx.http.post_multipart(endpoint, part)?;
        if !ACCEPTED_STATUS.contains(&response.status) {
            tracing::warn!(endpoint, status = response.status, "post rejected");
            return Err(ExchangeError::PostFailed {
                endpoint: endpoint.to_string(),
                status: response.status,
            });
        }

        let dims = ctx.store.describe(&self.image)?;
        tracing::info!(image = %self.image, status = response.status, "posted image");
        Ok(ImageOutput::new(self.image.clone(), dims))
    }
}
