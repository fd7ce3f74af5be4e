//! HTTP message types
//!
//! This module defines the request that goes on the wire and the response
//! read back from the gateway.

use super::{Headers, CRLF};

/// Protocol version written on the request line
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    uri: String,
    headers: Headers,
    body: Vec<u8>,
}

impl HttpRequest {
    /// Start a `POST` to `uri`
    pub fn post(uri: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder {
            uri: uri.into(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn method(&self) -> &'static str {
        "POST"
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Serialize to the exact bytes sent to the peer
    ///
    /// Request line, headers in insertion order, one blank line, body.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128 + self.body.len());

        buf.extend_from_slice(self.method().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(self.uri.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(HTTP_VERSION.as_bytes());
        buf.extend_from_slice(CRLF.as_bytes());

        self.headers.write_to(&mut buf);

        buf.extend_from_slice(CRLF.as_bytes());
        buf.extend_from_slice(&self.body);

        buf
    }
}

/// Builder for HTTP requests
#[derive(Debug)]
pub struct HttpRequestBuilder {
    uri: String,
    headers: Headers,
    body: Vec<u8>,
}

impl HttpRequestBuilder {

    /// Append a header; order is preserved on the wire
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Build the request
    ///
    /// When a body is present and no `Content-Length` was given, one is
    /// appended with the body's byte length.
    pub fn build(mut self) -> HttpRequest {
        if !self.body.is_empty() && !self.headers.contains("Content-Length") {
            self.headers.insert("Content-Length", self.body.len().to_string());
        }

        HttpRequest {
            uri: self.uri,
            headers: self.headers,
            body: self.body,
        }
    }
}

/// HTTP response as read back from the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status_code: u16,
    headers: Headers,
    body: String,
}

impl HttpResponse {
    pub fn new(status_code: u16, headers: Headers, body: impl Into<String>) -> Self {
        HttpResponse {
            status_code,
            headers,
            body: body.into(),
        }
    }

    /// Status code exactly as sent by the peer
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Everything after the header block, verbatim
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}
