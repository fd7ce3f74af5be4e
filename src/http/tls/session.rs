//! TLS session operations
//!
//! This module implements the SessionOps trait for TLS connections,
//! enabling transparent switching between plain TCP and TLS I/O.

use super::config::{TlsConfig, TlsError};
use crate::http::session::{io_error, poll_fd, PollEvents, SessionOps};
use crate::http::{Error, Result as HttpResult};
use openssl::ssl::{HandshakeError, Ssl, SslStream};
use openssl::x509::verify::X509CheckFlags;
use std::io::{Read, Write};
use std::net::{IpAddr, Shutdown, TcpStream};
use std::os::fd::AsRawFd;
use std::time::Duration;

/// TLS session operations
///
/// Wraps an OpenSSL SslStream and provides poll/read/write/close operations.
pub struct TlsSessionOps {
    stream: SslStream<TcpStream>,
    failed: bool,
}

impl TlsSessionOps {
    /// Create a client TLS connection (perform handshake)
    pub fn connect(tcp_stream: TcpStream, config: TlsConfig) -> Result<Self, TlsError> {
        let mut ssl = Ssl::new(&config.ctx)?;

        if let Some(ref servername) = config.servername {
            let param = ssl.param_mut();
            param.set_hostflags(X509CheckFlags::NO_PARTIAL_WILDCARDS);
            match servername.parse::<IpAddr>() {
                Ok(ip) => param.set_ip(ip)?,
                Err(_) => param.set_host(servername)?,
            }

            // SNI carries DNS names only
            if servername.parse::<IpAddr>().is_err() {
                ssl.set_hostname(servername)?;
            }
        }

        // Socket timeouts bound the blocking handshake
        tcp_stream.set_read_timeout(config.handshake_timeout)?;
        tcp_stream.set_write_timeout(config.handshake_timeout)?;

        let ssl_stream = match ssl.connect(tcp_stream) {
            Ok(stream) => stream,
            Err(HandshakeError::WouldBlock(_)) => return Err(TlsError::HandshakeTimeout),
            Err(HandshakeError::Failure(mid)) => {
                let verify = mid.ssl().verify_result();
                let reason = match verify.as_raw() {
                    0 => mid.error().to_string(),
                    _ => format!("{} ({})", mid.error(), verify.error_string()),
                };
                return Err(TlsError::HandshakeFailed(reason));
            }
            Err(HandshakeError::SetupFailure(e)) => return Err(TlsError::OpenSsl(e)),
        };

        tracing::debug!(
            version = ssl_stream.ssl().version_str(),
            cipher = ssl_stream.ssl().current_cipher().map(|c| c.name()).unwrap_or("none"),
            "TLS handshake complete"
        );

        Ok(TlsSessionOps {
            stream: ssl_stream,
            failed: false,
        })
    }

    /// Negotiated protocol version, e.g. `TLSv1.3`
    pub fn version(&self) -> &'static str {
        self.stream.ssl().version_str()
    }
}

impl SessionOps for TlsSessionOps {
    fn poll(&self, events: PollEvents, timeout: Option<Duration>) -> HttpResult<bool> {
        // Decrypted bytes may already be buffered inside OpenSSL
        if events == PollEvents::Read && self.stream.ssl().pending() > 0 {
            return Ok(true);
        }

        poll_fd(self.stream.get_ref().as_raw_fd(), events, timeout)
    }

    fn read(&mut self, buf: &mut [u8]) -> HttpResult<usize> {
        self.stream.read(buf).map_err(|e| {
            self.failed = true;
            io_error(e)
        })
    }

    fn write(&mut self, buf: &[u8]) -> HttpResult<usize> {
        self.stream.write(buf).map_err(|e| {
            self.failed = true;
            io_error(e)
        })
    }

    fn flush(&mut self) -> HttpResult<()> {
        self.stream.flush().map_err(|e| {
            self.failed = true;
            io_error(e)
        })
    }

    fn close(&mut self) -> HttpResult<()> {
        // close_notify only on a healthy session
        if !self.failed {
            let _ = self.stream.shutdown();
        }

        match self.stream.get_mut().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}
