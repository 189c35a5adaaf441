//! HTTP transport used by the invocations.
//!
//! [`HttpClient`] is the seam between the operations and the network;
//! [`CurlClient`] is the libcurl implementation. Tests substitute their own.

mod curl_client;
mod upload;

pub use curl_client::CurlClient;
pub use upload::{UploadPart, DEFAULT_FILENAME, EXPIRES_HEADER};

use crate::error::ExchangeError;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One blocking request per call; no retries.
pub trait HttpClient: Send + Sync {
    /// GET `url`. `Ok(None)` means the transfer finished without an HTTP
    /// response to report.
    fn get(&self, url: &str) -> Result<Option<HttpResponse>, ExchangeError>;

    /// POST `part` to `url` as a single-part `multipart/form-data` body.
    /// Redirects are not followed: a 3xx is returned as the response.
    fn post_multipart(&self, url: &str, part: UploadPart) -> Result<HttpResponse, ExchangeError>;
}

/// Host portion of `url` for log fields; `"-"` when it does not parse.
pub(crate) fn log_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "-".to_string())
}
