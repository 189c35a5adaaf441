//! Invocations: one execution of a named operation inside the host's graph.
//!
//! - `load_remote`: fetch a URL, decode to RGB, register with the store.
//! - `post_remote`: upload a stored image to an endpoint.
//!
//! Both are stateless; everything they touch arrives through
//! [`InvocationContext`].

mod load_remote;
mod post_remote;

pub use load_remote::LoadRemoteImage;
pub use post_remote::{PostImageToRemote, ACCEPTED_STATUS, UPLOAD_FIELD};

use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::http::HttpClient;
use crate::store::{Dimensions, ImageRef, ImageStore, StoredImage};

/// Content type given to the uploaded part unless configured otherwise.
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Collaborators and per-execution values supplied by the host.
pub struct InvocationContext<'a> {
    /// Graph execution session that owns images created by this invocation.
    pub session_id: String,
    pub store: &'a dyn ImageStore,
    pub http: &'a dyn HttpClient,
    /// Content type of the multipart part sent by uploads.
    pub content_type: String,
}

impl<'a> InvocationContext<'a> {
    pub fn new(
        session_id: impl Into<String>,
        store: &'a dyn ImageStore,
        http: &'a dyn HttpClient,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            store,
            http,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Reference plus dimensions, returned by both operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOutput {
    pub image: ImageRef,
    pub width: u32,
    pub height: u32,
}

impl ImageOutput {
    pub fn new(image: ImageRef, dims: Dimensions) -> Self {
        Self {
            image,
            width: dims.width,
            height: dims.height,
        }
    }

    pub fn from_stored(stored: StoredImage) -> Self {
        Self {
            image: stored.image,
            width: stored.width,
            height: stored.height,
        }
    }
}

/// A runnable operation.
pub trait Invocation {
    fn invoke(&self, ctx: &InvocationContext<'_>) -> Result<ImageOutput, ExchangeError>;
}
