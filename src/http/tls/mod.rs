//! TLS support for gateway connections
//!
//! TLS is layered on an already connected `TcpStream` using the session
//! operations abstraction:
//!
//! 1. `TlsConfig` holds the client context (system trust store, peer
//!    verification, protocol floor)
//! 2. `TlsSessionOps` performs the handshake and implements `SessionOps`
//!    for encrypted I/O
//! 3. `HttpClient` is unchanged, it just runs on the TLS session
//!
//! The peer certificate is always verified against the host name given to
//! [`ClientConfigBuilder::servername`], which is also sent as SNI.
//!
//! # Example
//!
//! ```no_run
//! use sms_relay::http::tls::TlsConfig;
//! use sms_relay::http::HttpClient;
//! use std::net::TcpStream;
//!
//! let tls_config = TlsConfig::client()
//!     .unwrap()
//!     .servername("gateway.example.com")
//!     .build();
//!
//! let tcp_stream = TcpStream::connect("gateway.example.com:443").unwrap();
//! let tls_session = tls_config.connect(tcp_stream).unwrap();
//! let mut client = HttpClient::new(tls_session);
//! ```

pub mod config;
pub mod session;

pub use config::{ClientConfigBuilder, TlsConfig, TlsError};
pub use session::TlsSessionOps;

/// Result type for TLS operations
pub type Result<T> = std::result::Result<T, TlsError>;
