//! TLS client configuration

use openssl::ssl::{SslContext, SslContextBuilder, SslMethod, SslVerifyMode, SslVersion};
use std::net::TcpStream;
use std::time::Duration;

/// TLS errors
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Handshake failed: {0}")]
    HandshakeFailed(String),

    #[error("Handshake timed out")]
    HandshakeTimeout,
}

/// TLS client configuration (immutable after building)
#[derive(Clone)]
pub struct TlsConfig {
    pub(crate) ctx: SslContext,
    pub(crate) servername: Option<String>,
    pub(crate) handshake_timeout: Option<Duration>,
}

impl TlsConfig {
    /// Create a new client configuration builder
    ///
    /// The context verifies the peer against the system trust store.
    pub fn client() -> Result<ClientConfigBuilder, TlsError> {
        ClientConfigBuilder::new()
    }

    /// Host name used for SNI and certificate verification
    pub fn servername(&self) -> Option<&str> {
        self.servername.as_deref()
    }

    /// Perform the client handshake on a connected stream
    pub fn connect(&self, stream: TcpStream) -> Result<super::TlsSessionOps, TlsError> {
        super::session::TlsSessionOps::connect(stream, self.clone())
    }
}

/// Client configuration builder
pub struct ClientConfigBuilder {
    ctx_builder: SslContextBuilder,
    servername: Option<String>,
    handshake_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    fn new() -> Result<Self, TlsError> {
        let mut ctx_builder = SslContextBuilder::new(SslMethod::tls_client())?;

        ctx_builder.set_default_verify_paths()?;
        ctx_builder.set_verify(SslVerifyMode::PEER);
        ctx_builder.set_min_proto_version(Some(SslVersion::TLS1_2))?;

        Ok(ClientConfigBuilder {
            ctx_builder,
            servername: None,
            handshake_timeout: None,
        })
    }

    /// Set the host name sent as SNI and checked against the certificate
    pub fn servername(mut self, name: impl Into<String>) -> Self {
        self.servername = Some(name.into());
        self
    }

    /// Bound the handshake; `None` waits forever
    pub fn handshake_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Build the TLS configuration
    pub fn build(self) -> TlsConfig {
        TlsConfig {
            ctx: self.ctx_builder.build(),
            servername: self.servername,
            handshake_timeout: self.handshake_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_builder() {
        let config = TlsConfig::client()
            .unwrap()
            .servername("gateway.example.com")
            .handshake_timeout(Some(Duration::from_secs(5)))
            .build();

        assert_eq!(config.servername(), Some("gateway.example.com"));
        assert_eq!(config.handshake_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_defaults() {
        let config = TlsConfig::client().unwrap().build();
        assert_eq!(config.servername(), None);
        assert_eq!(config.handshake_timeout, None);
    }
}
