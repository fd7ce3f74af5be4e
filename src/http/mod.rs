//! HTTP/1.1 implementation for sms-relay
//!
//! This module provides the small HTTP/1.1 client the gateway delivery runs
//! on: request serialization, a transport abstraction over plain TCP and
//! TLS, a read-until-close receive loop and a response parser.
//!
//! # Architecture
//!
//! The HTTP layer uses a session operations abstraction pattern that allows
//! seamless switching between plain TCP and TLS connections:
//!
//! - `SessionOps` trait defines operations (poll, read, write, flush, close)
//! - `HttpSession` wraps a `SessionOps` and applies the I/O timeout
//! - `HttpClient` is transparent to the underlying transport
//!
//! # Examples
//!
//! ```no_run
//! use sms_relay::http::{HttpClient, HttpRequest};
//! use sms_relay::http::session::FdSessionOps;
//! use std::net::TcpStream;
//!
//! let stream = TcpStream::connect("127.0.0.1:8080").unwrap();
//! let mut client = HttpClient::new(FdSessionOps::new(stream));
//!
//! let request = HttpRequest::post("/send_sms")
//!     .header("Host", "127.0.0.1:8080")
//!     .body(b"{}".to_vec())
//!     .build();
//! client.send_request(&request).unwrap();
//!
//! let raw = client.receive_until_close().unwrap();
//! let response = sms_relay::http::parser::parse_response(&raw).unwrap();
//! println!("{}", response.status_code());
//! ```

pub mod client;
pub mod headers;
pub mod message;
pub mod parser;
pub mod session;
pub mod tls;

pub use client::HttpClient;
pub use headers::Headers;
pub use message::{HttpRequest, HttpResponse};
pub use session::{HttpSession, SessionOps};

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP operation errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] crate::net::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] tls::TlsError),

    #[error("Response is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid HTTP status: {0}")]
    InvalidStatus(String),

    #[error("Timeout")]
    Timeout,

    #[error("Connection closed")]
    ConnectionClosed,
}

impl Error {
    /// Whether the error comes from the shape of the response rather than
    /// from talking to the peer
    pub fn is_framing(&self) -> bool {
        matches!(self, Error::Utf8(_) | Error::Parse(_) | Error::InvalidStatus(_))
    }
}

/// Maximum number of headers per message
pub const MAX_HEADERS: usize = 64;

/// CRLF line ending
pub const CRLF: &str = "\r\n";

/// Blank line separating the header block from the body
pub const HEADER_TERMINATOR: &str = "\r\n\r\n";

/// Size of a single read from the transport
pub const READ_CHUNK_SIZE: usize = 4096;
