//! Minimal HTTP/1.1 server for integration tests.
//!
//! Answers GET with a fixed status and body, answers POST with a fixed status
//! and records each POST request so tests can inspect the multipart body.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub get_status: u16,
    pub get_body: Vec<u8>,
    pub post_status: u16,
    /// `Location` header sent with the POST response (for 3xx answers).
    pub post_location: Option<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            get_status: 200,
            get_body: Vec::new(),
            post_status: 201,
            post_location: None,
        }
    }
}

/// A request received by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct ImageServer {
    pub base_url: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl ImageServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn posts(&self) -> Vec<Recorded> {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == "POST")
            .cloned()
            .collect()
    }

    pub fn requests(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    /// `METHOD /path` of every request, in arrival order.
    pub fn request_lines(&self) -> Vec<String> {
        self.recorded
            .lock()
            .unwrap()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

/// Serve `body` with 200 for GET; POST answers 201.
pub fn serve(body: Vec<u8>) -> ImageServer {
    start(ServerOptions {
        get_body: body,
        ..Default::default()
    })
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start(opts: ServerOptions) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let rec = Arc::clone(&recorded);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let rec = Arc::clone(&rec);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &opts, &rec));
        }
    });
    ImageServer {
        base_url: format!("http://127.0.0.1:{}/", port),
        recorded,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn handle(mut stream: TcpStream, opts: &ServerOptions, recorded: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let Some(req) = read_request(&mut stream) else {
        return;
    };
    let (status, body, location) = match req.method.as_str() {
        "GET" => (opts.get_status, opts.get_body.clone(), None),
        "POST" => (
            opts.post_status,
            b"{\"ok\":true}".to_vec(),
            opts.post_location.as_deref(),
        ),
        _ => (405, Vec::new(), None),
    };
    recorded.lock().unwrap().push(req);

    let location = location
        .map(|l| format!("Location: {l}\r\n"))
        .unwrap_or_default();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        reason(status),
        body.len(),
        location
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buf[..header_end]).ok()?.to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next().unwrap_or("/").to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let expects_continue = headers
        .iter()
        .any(|(k, v)| k.eq_ignore_ascii_case("expect") && v.eq_ignore_ascii_case("100-continue"));
    if expects_continue {
        let _ = stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n");
    }

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Recorded {
        method,
        path,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// One part of a parsed `multipart/form-data` body.
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Raw part header lines.
    pub headers: Vec<String>,
    pub data: Vec<u8>,
}

impl FormPart {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|l| {
            let (k, v) = l.split_once(':')?;
            k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }
}

/// Split a multipart body using the boundary from the request's Content-Type.
pub fn form_parts(req: &Recorded) -> Vec<FormPart> {
    let Some(ct) = req.header("content-type") else {
        return Vec::new();
    };
    let Some(boundary) = ct
        .split(';')
        .find_map(|p| p.trim().strip_prefix("boundary="))
    else {
        return Vec::new();
    };
    let delim = format!("--{}", boundary.trim_matches('"'));
    let delim = delim.as_bytes();

    let mut parts = Vec::new();
    let mut rest = req.body.as_slice();
    while let Some(start) = find(rest, delim) {
        rest = &rest[start + delim.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        let rest_after_crlf = rest.strip_prefix(b"\r\n").unwrap_or(rest);
        let Some(head_end) = find(rest_after_crlf, b"\r\n\r\n") else {
            break;
        };
        let head = String::from_utf8_lossy(&rest_after_crlf[..head_end]).into_owned();
        let content = &rest_after_crlf[head_end + 4..];
        let Some(end) = find(content, delim) else {
            break;
        };
        // Data ends with CRLF before the next delimiter.
        let data = content[..end].strip_suffix(b"\r\n").unwrap_or(&content[..end]);
        parts.push(FormPart {
            headers: head.split("\r\n").map(str::to_string).collect(),
            data: data.to_vec(),
        });
        rest = &content[end..];
    }
    parts
}
