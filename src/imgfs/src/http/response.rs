//! Writing an HTTP/1.1 response back to a connection (spec.md §4.4; the
//! source's `http_reply`/`http_serve_file`).

use crate::http::transport;
use std::io;
use std::net::TcpStream;

/// A status line plus a `Content-Type` and body, ready to be serialised.
pub struct HttpResponse {
    pub status: u16,
    pub reason: &'static str,
    pub content_type: &'static str,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> HttpResponse {
        HttpResponse {
            status: 200,
            reason: "OK",
            content_type,
            location: None,
            body,
        }
    }

    pub fn error(status: u16, reason: &'static str, message: &str) -> HttpResponse {
        HttpResponse {
            status,
            reason,
            content_type: "text/plain; charset=utf-8",
            location: None,
            body: message.as_bytes().to_vec(),
        }
    }

    /// A `302 Found` pointing `location`, the success reply to `insert` and
    /// `delete` (the source's `reply_302_msg`).
    pub fn found(location: String) -> HttpResponse {
        HttpResponse {
            status: 302,
            reason: "Found",
            content_type: "text/plain; charset=utf-8",
            location: Some(location),
            body: Vec::new(),
        }
    }

    fn serialise(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.body.len() + 128);
        out.extend_from_slice(
            format!("HTTP/1.1 {} {}\r\n", self.status, self.reason).as_bytes(),
        );
        out.extend_from_slice(format!("Content-Type: {}\r\n", self.content_type).as_bytes());
        out.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        if let Some(location) = &self.location {
            out.extend_from_slice(format!("Location: {}\r\n", location).as_bytes());
        }
        out.extend_from_slice(b"Connection: keep-alive\r\n");
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out
    }
}

/// Writes `response` to `conn`, retrying partial writes until the whole
/// buffer is flushed (the source's `http_reply` write loop).
pub fn send(conn: &mut TcpStream, response: &HttpResponse) -> io::Result<()> {
    let bytes = response.serialise();
    transport::send(conn, &bytes)
}
