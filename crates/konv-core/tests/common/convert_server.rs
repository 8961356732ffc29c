//! Minimal HTTP/1.1 stand-in for the konverter service, for integration tests.
//!
//! Serves `POST /api/convert` (multipart), `POST /api/zip` (JSON) and
//! `GET /api/stats`. The uploaded filename picks the reply: names containing
//! `bad` get a 200 error body, names containing `huge` get a plain-text 413.
//! Every request is recorded so tests can assert on order and payloads.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct ServerOptions {
    /// If false, `/api/zip` answers 500 with a plain-text body.
    pub zip_ok: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self { zip_ok: true }
    }
}

/// What the server has seen so far.
#[derive(Debug, Default, Clone)]
pub struct ServerLog {
    /// (filename, format, quality) per convert request, in arrival order.
    pub converts: Vec<(String, String, String)>,
    /// Raw JSON body of each zip request.
    pub zips: Vec<String>,
    pub successes: u64,
}

pub struct ConvertServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub url: String,
    log: Arc<Mutex<ServerLog>>,
}

impl ConvertServer {
    pub fn log(&self) -> ServerLog {
        self.log.lock().unwrap().clone()
    }
}

pub fn start() -> ConvertServer {
    start_with_options(ServerOptions::default())
}

/// Starts the server on a background thread; it runs until the process exits.
pub fn start_with_options(opts: ServerOptions) -> ConvertServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let log = Arc::new(Mutex::new(ServerLog::default()));
    let shared = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let log = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &log, opts));
        }
    });
    ConvertServer {
        url: format!("http://127.0.0.1:{}/", port),
        log,
    }
}

fn handle(mut stream: TcpStream, log: &Mutex<ServerLog>, opts: ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some((method, path, body)) = read_request(&mut stream) else {
        return;
    };
    let body = String::from_utf8_lossy(&body).into_owned();

    let (status, content_type, reply) = match (method.as_str(), path.as_str()) {
        ("POST", "/api/convert") => convert(&body, log),
        ("POST", "/api/zip") => {
            log.lock().unwrap().zips.push(body);
            if opts.zip_ok {
                (
                    "200 OK",
                    "application/json",
                    r#"{"status":"success","download_url":"/downloads/batch_0001.zip"}"#.to_string(),
                )
            } else {
                ("500 Internal Server Error", "text/plain", "Zip creation failed".to_string())
            }
        }
        ("GET", "/api/stats") => {
            let total = log.lock().unwrap().successes;
            (
                "200 OK",
                "application/json",
                format!(r#"{{"total_conversions":{}}}"#, total),
            )
        }
        _ => ("404 Not Found", "text/plain", "Not Found".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        reply.len(),
        reply
    );
    let _ = stream.write_all(response.as_bytes());
}

fn convert(body: &str, log: &Mutex<ServerLog>) -> (&'static str, &'static str, String) {
    let filename = between(body, "filename=\"", "\"").unwrap_or_default();
    let format = form_field(body, "format").unwrap_or_default();
    let quality = form_field(body, "quality").unwrap_or_default();
    let mut log = log.lock().unwrap();
    log.converts.push((filename.clone(), format.clone(), quality));

    if filename.contains("huge") {
        return ("413 Payload Too Large", "text/plain", "File too large".to_string());
    }
    if filename.contains("bad") {
        return (
            "200 OK",
            "application/json",
            r#"{"status":"error","error":"Conversion failed"}"#.to_string(),
        );
    }
    log.successes += 1;
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(&filename);
    let link = format!("/downloads/konverter_{:05}_{}.{}", log.successes, stem, format);
    (
        "200 OK",
        "application/json",
        format!(r#"{{"status":"success","download_url":"{}"}}"#, link),
    )
}

/// Value of a plain multipart text part.
fn form_field(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{}\"", name);
    let start = body.find(&marker)? + marker.len();
    let rest = &body[start..];
    let value_start = rest.find("\r\n\r\n")? + 4;
    let value = &rest[value_start..];
    let end = value.find("\r\n")?;
    Some(value[..end].to_string())
}

fn between(haystack: &str, open: &str, close: &str) -> Option<String> {
    let start = haystack.find(open)? + open.len();
    let end = haystack[start..].find(close)? + start;
    Some(haystack[start..end].to_string())
}

/// Reads one request: (method, path, body). Body length comes from Content-Length.
fn read_request(stream: &mut TcpStream) -> Option<(String, String, Vec<u8>)> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&data[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < header_end + content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buf[..n]);
    }
    let body = data.split_off(header_end);
    Some((method, path, body))
}
