//! HTTP client implementation
//!
//! One request, one response, one connection: the request is written in a
//! single logical send and the response is read until the peer closes.

use super::{parser, Error, HttpRequest, HttpSession, Result, SessionOps, READ_CHUNK_SIZE};
use bytes::BytesMut;
use std::time::Duration;

/// HTTP client
pub struct HttpClient<S: SessionOps> {
    session: HttpSession<S>,
    buffer: BytesMut,
}

impl<S: SessionOps> HttpClient<S> {
    /// Create a new HTTP client with a session
    pub fn new(session: S) -> Self {
        HttpClient {
            session: HttpSession::new(session),
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Set the timeout for each read and write; `None` blocks forever
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.session.set_timeout(timeout);
    }

    /// Send a request
    pub fn send_request(&mut self, request: &HttpRequest) -> Result<()> {
        self.send_raw(&request.to_wire())
    }

    /// Write all of `wire`, retrying partial writes
    pub fn send_raw(&mut self, wire: &[u8]) -> Result<()> {
        let mut written = 0;

        while written < wire.len() {
            let n = self.session.write(&wire[written..])?;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }
            written += n;
        }

        self.session.flush()?;
        tracing::trace!(bytes = written, "request written");
        Ok(())
    }

    /// Read the whole response
    ///
    /// Reads until the peer closes the connection. If the header block
    /// announces a `Content-Length` and that many body bytes have arrived,
    /// reading stops early so gateways that keep the connection open do
    /// not stall the exchange.
    pub fn receive_until_close(&mut self) -> Result<Vec<u8>> {
        self.buffer.clear();
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            let n = self.session.read(&mut chunk)?;
            if n == 0 {
                tracing::trace!(bytes = self.buffer.len(), "peer closed connection");
                break;
            }

            self.buffer.extend_from_slice(&chunk[..n]);

            if let Some(total) = parser::expected_length(&self.buffer) {
                if self.buffer.len() >= total {
                    tracing::trace!(bytes = self.buffer.len(), "Content-Length satisfied");
                    break;
                }
            }
        }

        Ok(self.buffer.split().to_vec())
    }

    /// Close the connection
    pub fn close(&mut self) -> Result<()> {
        self.session.close()
    }
}
