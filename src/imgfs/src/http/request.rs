//! HTTP request parsing: request-line + headers + optional body, fed one
//! socket read at a time through a small state machine (spec.md §4.3
//! "Parser state machine").

use crate::error::{ImgFsError, Result};

const HEADER_END_DELIM: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    HeadersIncomplete,
    AwaitBody,
    Complete,
}

/// One fully parsed request: method, full request-target (path + query
/// string), and body bytes.
#[derive(Debug, Clone)]
pub struct HttpMessage {
    pub method: String,
    pub uri: String,
    pub body: Vec<u8>,
}

/// Accumulates bytes read off one connection and drives the
/// `HeadersIncomplete -> AwaitBody -> Complete` state machine described in
/// spec.md §4.3. A single instance is reused across pipelined requests on
/// the same connection: residual bytes read past a completed body are kept
/// as the start of the next request (spec.md §9 "HTTP parser reuses
/// residual bytes").
pub struct RequestParser {
    buffer: Vec<u8>,
    state: ParseState,
    max_header_size: usize,
    /// Set once headers are known complete; `header_end` is the offset of
    /// the first body byte, `content_length` is the announced body length.
    framing: Option<(usize, usize)>,
}

impl RequestParser {
    pub fn new(max_header_size: usize) -> RequestParser {
        RequestParser {
            buffer: Vec::with_capacity(max_header_size),
            state: ParseState::HeadersIncomplete,
            max_header_size,
            framing: None,
        }
    }

    /// Appends freshly-read bytes and advances the state machine as far as
    /// it can go. Returns `Some(message)` once a full request is available;
    /// the caller must call [`RequestParser::advance_past_last_message`]
    /// after dispatching it before feeding more bytes.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<HttpMessage>> {
        self.buffer.extend_from_slice(chunk);

        if self.state == ParseState::HeadersIncomplete {
            if let Some(pos) = find_subslice(&self.buffer, HEADER_END_DELIM) {
                let header_end = pos + HEADER_END_DELIM.len();
                let content_length = parse_content_length(&self.buffer[..header_end]);
                self.framing = Some((header_end, content_length));
                self.state = if content_length > 0 {
                    ParseState::AwaitBody
                } else {
                    ParseState::Complete
                };
            } else if self.buffer.len() >= self.max_header_size {
                return Err(ImgFsError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "header section exceeded MAX_HEADER_SIZE without a terminator",
                )));
            }
        }

        if self.state == ParseState::AwaitBody {
            let (header_end, content_length) = self.framing.expect("framing set before AwaitBody");
            if self.buffer.len() >= header_end + content_length {
                self.state = ParseState::Complete;
            }
        }

        if self.state == ParseState::Complete {
            let message = self.parse_complete_message()?;
            Ok(Some(message))
        } else {
            Ok(None)
        }
    }

    fn parse_complete_message(&self) -> Result<HttpMessage> {
        let (header_end, content_length) = self.framing.ok_or(ImgFsError::Runtime)?;

        let head = std::str::from_utf8(&self.buffer[..header_end - HEADER_END_DELIM.len()])
            .map_err(|_| ImgFsError::InvalidArgument)?;
        let request_line = head.lines().next().ok_or(ImgFsError::InvalidArgument)?;
        let mut parts = request_line.split_whitespace();
        let method = parts.next().ok_or(ImgFsError::InvalidArgument)?.to_string();
        let uri = parts.next().ok_or(ImgFsError::InvalidArgument)?.to_string();

        let body_end = (header_end + content_length).min(self.buffer.len());
        let body = self.buffer[header_end..body_end].to_vec();

        Ok(HttpMessage { method, uri, body })
    }

    /// Drops the bytes belonging to the just-dispatched message and resets
    /// the state machine, preserving any residual bytes already read past
    /// the body as the start of the next request (pipelining-friendly).
    pub fn advance_past_last_message(&mut self) {
        if let Some((header_end, content_length)) = self.framing.take() {
            let consumed = (header_end + content_length).min(self.buffer.len());
            self.buffer.drain(..consumed);
        }
        self.state = ParseState::HeadersIncomplete;
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn parse_content_length(head: &[u8]) -> usize {
    let head = String::from_utf8_lossy(head);
    for line in head.lines().skip(1) {
        if let Some((key, value)) = line.split_once(':') {
            if key.trim().eq_ignore_ascii_case("content-length") {
                return value.trim().parse().unwrap_or(0);
            }
        }
    }
    0
}

/// Compares the request's method to `verb`, exactly (spec.md §4.3; the
/// source's `http_match_verb`).
pub fn match_verb(method: &str, verb: &str) -> bool {
    method.eq_ignore_ascii_case(verb)
}

/// True if `uri` starts with `target`, matching it as a path prefix (the
/// source's `http_match_uri`).
pub fn match_uri(uri: &str, target: &str) -> bool {
    uri.starts_with(target)
}

/// Extracts the value of query parameter `name` from a `path?a=1&b=2`-style
/// request-target (the source's `http_get_var`). Returns `None` if the
/// parameter is absent.
pub fn get_var<'a>(uri: &'a str, name: &str) -> Option<&'a str> {
    let query = uri.split_once('?').map(|(_, q)| q)?;
    for pair in query.split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            if key == name {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_headerless_body_get_request() {
        let mut parser = RequestParser::new(4096);
        let request = b"GET /imgfs/list HTTP/1.1\r\nHost: x\r\n\r\n";
        let msg = parser.feed(request).unwrap().unwrap();
        assert_eq!(msg.method, "GET");
        assert_eq!(msg.uri, "/imgfs/list");
        assert!(msg.body.is_empty());
    }

    #[test]
    fn parses_a_request_with_body_across_two_reads() {
        let mut parser = RequestParser::new(4096);
        let head = b"POST /imgfs/insert?name=cat.jpg HTTP/1.1\r\nContent-Length: 5\r\n\r\n";
        assert!(parser.feed(head).unwrap().is_none());
        let msg = parser.feed(b"hello").unwrap().unwrap();
        assert_eq!(msg.body, b"hello");
    }

    #[test]
    fn carries_residual_bytes_into_the_next_request() {
        let mut parser = RequestParser::new(4096);
        let first = b"GET /imgfs/list HTTP/1.1\r\n\r\n";
        let second = b"GET /imgfs/delete?img_id=a HTTP/1.1\r\n\r\n";
        let mut combined = first.to_vec();
        combined.extend_from_slice(second);

        let msg1 = parser.feed(&combined).unwrap().unwrap();
        assert_eq!(msg1.uri, "/imgfs/list");
        parser.advance_past_last_message();

        let msg2 = parser.feed(b"").unwrap().unwrap();
        assert_eq!(msg2.uri, "/imgfs/delete?img_id=a");
    }

    #[test]
    fn carries_residual_bytes_past_a_request_with_a_body() {
        let mut parser = RequestParser::new(4096);
        let first = b"POST /imgfs/insert?name=a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc";
        let second = b"GET /imgfs/list HTTP/1.1\r\n\r\n";
        let mut combined = first.to_vec();
        combined.extend_from_slice(second);

        let msg1 = parser.feed(&combined).unwrap().unwrap();
        assert_eq!(msg1.body, b"abc");
        parser.advance_past_last_message();

        let msg2 = parser.feed(b"").unwrap().unwrap();
        assert_eq!(msg2.uri, "/imgfs/list");
    }

    #[test]
    fn get_var_extracts_query_parameters() {
        let uri = "/imgfs/read?img_id=cat.jpg&res=small";
        assert_eq!(get_var(uri, "img_id"), Some("cat.jpg"));
        assert_eq!(get_var(uri, "res"), Some("small"));
        assert_eq!(get_var(uri, "missing"), None);
    }
}
