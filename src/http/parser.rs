//! HTTP response parsing
//!
//! The gateway is read until it closes the connection, so parsing works on
//! the whole accumulated buffer at once rather than incrementally.

use super::{Error, Headers, HttpResponse, Result, CRLF, HEADER_TERMINATOR};

/// Find the first occurrence of `needle` in `haystack`
fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parse the status code out of a status line
///
/// Format: VERSION SP STATUS SP REASON
/// Example: HTTP/1.1 200 OK
///
/// Only the second single-space-delimited token is looked at; the version
/// and reason are not validated.
pub fn parse_status_line(line: &str) -> Result<u16> {
    let token = line
        .split(' ')
        .nth(1)
        .ok_or_else(|| Error::InvalidStatus(format!("No status code in: {}", line)))?;

    token
        .parse::<u16>()
        .map_err(|_| Error::InvalidStatus(format!("Invalid status code: {}", token)))
}

/// Parse a complete raw response
///
/// The body is everything after the first blank line, returned as-is:
/// no `Content-Length` truncation and no dechunking.
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    let text = std::str::from_utf8(raw)?;

    let (head, body) = text
        .split_once(HEADER_TERMINATOR)
        .ok_or_else(|| Error::Parse("could not parse response".to_string()))?;

    let mut lines = head.split(CRLF);
    let status_line = lines.next().unwrap_or_default();
    let status_code = parse_status_line(status_line)?;
    let headers = Headers::parse_lenient(lines);

    Ok(HttpResponse::new(status_code, headers, body))
}

/// Total size of the response in `buf`, once it can be known
///
/// Returns `Some` only when the header block is complete and carries a
/// valid `Content-Length`. Without one the response ends when the peer
/// closes the connection.
pub fn expected_length(buf: &[u8]) -> Option<usize> {
    let head_end = find_subslice(buf, HEADER_TERMINATOR.as_bytes())?;
    let head = std::str::from_utf8(&buf[..head_end]).ok()?;

    let headers = Headers::parse_lenient(head.split(CRLF).skip(1));
    let content_length = headers.content_length().ok()??;

    // A Content-Length too large to add up means read until close
    head_end
        .checked_add(HEADER_TERMINATOR.len())?
        .checked_add(content_length)
}
