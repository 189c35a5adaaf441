//! Error types for the remote image operations.
//!
//! Recognized failures carry the offending URL or endpoint in their message.
//! Transport faults from libcurl pass through unchanged.

use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;

/// Error returned by an invocation (fetch or post) or by registry dispatch.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The transfer completed but produced no usable response.
    #[error("Failed to retrieve a file from URL {url}{}", status_suffix(.status))]
    RetrievalFailed { url: String, status: Option<u32> },

    /// The response body is not a decodable image.
    #[error("Failed to decode image from URL {url}")]
    DecodeFailed {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// The endpoint answered with a status other than 200 or 201.
    #[error("Failed to post image to {endpoint}: HTTP {status}")]
    PostFailed { endpoint: String, status: u32 },

    /// DNS, connect, TLS and other libcurl failures.
    #[error(transparent)]
    Transport(#[from] curl::Error),

    /// libcurl rejected the multipart form.
    #[error(transparent)]
    Form(#[from] curl::FormError),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("invalid input for {operation}")]
    InvalidInput {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

fn status_suffix(status: &Option<u32>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}
