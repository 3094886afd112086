use std::fmt;

use crate::http::request::{Method, RequestHead, Version};

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line does not match `METHOD SP TARGET SP HTTP/1.x`
    InvalidRequest,
    InvalidMethod,
    InvalidVersion,
    InvalidContentLength,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            ParseError::InvalidRequest => "invalid request line",
            ParseError::InvalidMethod => "unsupported method",
            ParseError::InvalidVersion => "unsupported HTTP version",
            ParseError::InvalidContentLength => "invalid Content-Length",
        };
        f.write_str(what)
    }
}

impl std::error::Error for ParseError {}

/// Parses the head of a request from its header block.
///
/// `block` is everything up to and including the blank line; bytes past it
/// are never looked at. Only `Content-Length` and `Connection` are read from
/// the header fields, every other field is ignored. A bad `Content-Length`
/// does not fail the head; it is reported through `RequestHead::content_length`.
pub fn parse_request_head(block: &[u8]) -> Result<RequestHead, ParseError> {
    let mut lines = header_lines(block);
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let request_line = std::str::from_utf8(request_line).map_err(|_| ParseError::InvalidRequest)?;

    // Exactly two single spaces; the target itself may be empty.
    let mut parts = request_line.splitn(3, ' ');
    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version_str = parts.next().ok_or(ParseError::InvalidRequest)?;

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;
    let version = Version::from_str(version_str).ok_or(ParseError::InvalidVersion)?;

    Ok(RequestHead {
        method,
        target: target.to_string(),
        version,
        content_length: content_length(block),
        wants_close: wants_close(block),
    })
}

/// Offset just past the first `\r\n\r\n` in `buf`, searching from `from`.
///
/// `from` lets the accumulator skip bytes it has already scanned.
pub fn find_headers_end(buf: &[u8], from: usize) -> Option<usize> {
    let start = from.min(buf.len());
    buf[start..]
        .windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| start + pos + HEADER_TERMINATOR.len())
}

/// Value of the first `Content-Length` field (case-insensitive name), or 0.
pub fn content_length(block: &[u8]) -> Result<usize, ParseError> {
    match header_fields(block).find(|(name, _)| name.eq_ignore_ascii_case("content-length")) {
        Some((_, value)) => value
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength),
        None => Ok(0),
    }
}

/// True when any `Connection` field carries the `close` token.
///
/// Usable on a block whose request line failed to parse, so the connection
/// loop can still honor the client's close request.
pub fn wants_close(block: &[u8]) -> bool {
    header_fields(block)
        .filter(|(name, _)| name.eq_ignore_ascii_case("connection"))
        .any(|(_, value)| {
            value
                .split(',')
                .any(|token| token.trim().eq_ignore_ascii_case("close"))
        })
}

fn header_lines(block: &[u8]) -> impl Iterator<Item = &[u8]> {
    block
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .take_while(|line| !line.is_empty())
}

fn header_fields(block: &[u8]) -> impl Iterator<Item = (String, String)> + '_ {
    header_lines(block).skip(1).filter_map(|line| {
        let line = String::from_utf8_lossy(line);
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_string(), value.trim().to_string()))
    })
}
