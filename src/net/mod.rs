//! Network utilities
//!
//! Splitting gateway addresses into host and port, and opening the TCP
//! connection the HTTP layer runs on.

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::fmt;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Result type for network operations
pub type Result<T> = std::result::Result<T, Error>;

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Could not resolve host: {0}")]
    Resolve(String),

    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Connection to {0} timed out")]
    ConnectTimeout(SocketAddr),
}

/// Port used when the address carries none
pub const DEFAULT_PORT: u16 = 80;

/// Host and port of a gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    host: String,
    port: u16,
}

impl HostPort {
    /// Create from parts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        HostPort {
            host: host.into(),
            port,
        }
    }

    /// Parse an address of the form `host`, `host:port`, `[v6]`, `[v6]:port`
    /// or a bare IPv6 literal.
    ///
    /// A missing port defaults to [`DEFAULT_PORT`]. A bare address with more
    /// than one colon is taken to be an IPv6 literal without a port.
    pub fn parse(address: &str) -> Result<Self> {
        let (host, port) = if let Some(rest) = address.strip_prefix('[') {
            let end = rest
                .find(']')
                .ok_or_else(|| Error::InvalidAddress(address.to_string()))?;
            let host = &rest[..end];
            let port = match &rest[end + 1..] {
                "" => DEFAULT_PORT,
                tail => match tail.strip_prefix(':') {
                    Some(port) => parse_port(port)?,
                    None => return Err(Error::InvalidAddress(address.to_string())),
                },
            };
            (host, port)
        } else {
            match address.matches(':').count() {
                0 => (address, DEFAULT_PORT),
                1 => {
                    // Exactly one colon, checked above
                    let (host, port) = address.split_once(':').unwrap_or((address, ""));
                    (host, parse_port(port)?)
                }
                _ => (address, DEFAULT_PORT),
            }
        };

        if host.is_empty() {
            return Err(Error::InvalidAddress(address.to_string()));
        }

        Ok(HostPort::new(host, port))
    }

    /// Host name or IP literal (without brackets)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port number
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn parse_port(s: &str) -> Result<u16> {
    s.parse::<u16>()
        .map_err(|_| Error::InvalidPort(s.to_string()))
}

/// Resolve `target` and open a TCP connection to the first address that
/// accepts.
///
/// With a timeout, each connection attempt is bounded by it.
pub fn connect(target: &HostPort, timeout: Option<Duration>) -> Result<TcpStream> {
    let addrs: Vec<SocketAddr> = (target.host(), target.port())
        .to_socket_addrs()
        .map_err(|e| Error::Resolve(format!("{}: {}", target.host(), e)))?
        .collect();

    if addrs.is_empty() {
        return Err(Error::Resolve(target.host().to_string()));
    }

    let mut last_err = None;
    for addr in addrs {
        match connect_addr(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!(%addr, error = %e, "connection attempt failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| Error::Resolve(target.host().to_string())))
}

fn connect_addr(addr: SocketAddr, timeout: Option<Duration>) -> Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    let sock_addr = SockAddr::from(addr);

    let connected = match timeout {
        Some(t) => socket.connect_timeout(&sock_addr, t),
        None => socket.connect(&sock_addr),
    };

    if let Err(e) = connected {
        return Err(match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::ConnectTimeout(addr),
            _ => Error::Connect { addr, source: e },
        });
    }

    socket.set_nodelay(true)?;
    Ok(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_parse_host_and_port() {
        let hp = HostPort::parse("example.com:8443").unwrap();
        assert_eq!(hp.host(), "example.com");
        assert_eq!(hp.port(), 8443);
    }

    #[test]
    fn test_parse_default_port() {
        let hp = HostPort::parse("example.com").unwrap();
        assert_eq!(hp.host(), "example.com");
        assert_eq!(hp.port(), 80);
    }

    #[test]
    fn test_parse_ipv6() {
        let hp = HostPort::parse("[::1]:8080").unwrap();
        assert_eq!(hp.host(), "::1");
        assert_eq!(hp.port(), 8080);

        let hp = HostPort::parse("[fe80::1]").unwrap();
        assert_eq!(hp.host(), "fe80::1");
        assert_eq!(hp.port(), 80);

        let hp = HostPort::parse("::1").unwrap();
        assert_eq!(hp.host(), "::1");
        assert_eq!(hp.port(), 80);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(HostPort::parse("example.com:"), Err(Error::InvalidPort(_))));
        assert!(matches!(HostPort::parse("example.com:http"), Err(Error::InvalidPort(_))));
        assert!(matches!(HostPort::parse("example.com:70000"), Err(Error::InvalidPort(_))));
        assert!(matches!(HostPort::parse("[::1"), Err(Error::InvalidAddress(_))));
        assert!(matches!(HostPort::parse("[::1]8080"), Err(Error::InvalidAddress(_))));
        assert!(matches!(HostPort::parse(":8080"), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(HostPort::new("example.com", 80).to_string(), "example.com:80");
        assert_eq!(HostPort::new("::1", 443).to_string(), "[::1]:443");
    }

    #[test]
    fn test_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let stream = connect(&HostPort::new("127.0.0.1", port), None).unwrap();
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[test]
    fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = connect(
            &HostPort::new("127.0.0.1", port),
            Some(Duration::from_secs(1)),
        );
        assert!(matches!(result, Err(Error::Connect { .. })));
    }
}
