//! libcurl-backed [`HttpClient`].
//!
//! Each call builds a fresh `Easy` handle, performs one transfer on the
//! current thread and returns. No timeouts are set beyond libcurl's own
//! defaults and nothing is retried.

use curl::easy::{Easy, Form, List};

use super::{HttpClient, HttpResponse, UploadPart};
use crate::error::ExchangeError;

#[derive(Debug, Clone, Default)]
pub struct CurlClient {
    user_agent: Option<String>,
}

impl CurlClient {
    pub fn new(user_agent: Option<String>) -> Self {
        Self { user_agent }
    }

    fn handle(&self, url: &str, follow_redirects: bool) -> Result<Easy, curl::Error> {
        let mut easy = Easy::new();
        easy.url(url)?;
        easy.follow_location(follow_redirects)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }
        Ok(easy)
    }
}

/// Run the transfer configured on `easy`, collecting the response body.
fn perform(easy: &mut Easy) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let code = easy.response_code()?;
    Ok((code, body))
}

impl HttpClient for CurlClient {
    fn get(&self, url: &str) -> Result<Option<HttpResponse>, ExchangeError> {
        let mut easy = self.handle(url, true)?;
        let (status, body) = perform(&mut easy)?;
        // libcurl reports 0 when no HTTP status line was received.
        if status == 0 {
            return Ok(None);
        }
        Ok(Some(HttpResponse { status, body }))
    }

    fn post_multipart(&self, url: &str, part: UploadPart) -> Result<HttpResponse, ExchangeError> {
        // A redirect would be replayed as a bodiless GET; the endpoint's own
        // status is the one that counts.
        let mut easy = self.handle(url, false)?;

        let UploadPart {
            field,
            filename,
            content_type,
            headers: extra_headers,
            data,
        } = part;
        let mut part_headers = List::new();
        for h in &extra_headers {
            part_headers.append(h)?;
        }
        let mut form = Form::new();
        form.part(&field)
            .buffer(&filename, data)
            .content_type(&content_type)
            .content_header(part_headers)
            .add()?;
        easy.httppost(form)?;

        // Send the body immediately instead of waiting on 100-continue.
        let mut headers = List::new();
        headers.append("Expect:")?;
        easy.http_headers(headers)?;

        let (status, body) = perform(&mut easy)?;
        Ok(HttpResponse { status, body })
    }
}
