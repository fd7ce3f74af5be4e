//! Delivery results

use crate::http::HttpResponse;
use std::fmt;

/// Status code reported for every local failure
pub const LOCAL_FAILURE_STATUS: u16 = 500;

/// What happened to one delivery attempt
///
/// A gateway that answers `500` is [`SendOutcome::Remote`]; failing to talk
/// to the gateway at all is one of the two failure variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The gateway answered; status and body as received
    Remote { status_code: u16, body: String },
    /// Address, DNS, connect, TLS, write, read or timeout failure
    LocalTransportFailure(String),
    /// The bytes read back are not an HTTP response we can parse
    ResponseFramingFailure(String),
}

impl SendOutcome {
    pub fn is_remote(&self) -> bool {
        matches!(self, SendOutcome::Remote { .. })
    }

    /// Failure message for local failures
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SendOutcome::Remote { .. } => None,
            SendOutcome::LocalTransportFailure(msg) | SendOutcome::ResponseFramingFailure(msg) => {
                Some(msg)
            }
        }
    }
}

impl From<HttpResponse> for SendOutcome {
    fn from(response: HttpResponse) -> Self {
        SendOutcome::Remote {
            status_code: response.status_code(),
            body: response.into_body(),
        }
    }
}

impl From<crate::http::Error> for SendOutcome {
    fn from(err: crate::http::Error) -> Self {
        if err.is_framing() {
            SendOutcome::ResponseFramingFailure(err.to_string())
        } else {
            SendOutcome::LocalTransportFailure(err.to_string())
        }
    }
}

/// Status code and body, as printed to the user
///
/// Local failures collapse to status 500 with a `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub status_code: u16,
    pub body: String,
}

impl HttpResult {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        HttpResult {
            status_code,
            body: body.into(),
        }
    }

    /// The 500 sentinel carrying `message`
    pub fn local_failure(message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        HttpResult::new(LOCAL_FAILURE_STATUS, body)
    }
}

impl From<SendOutcome> for HttpResult {
    fn from(outcome: SendOutcome) -> Self {
        match outcome {
            SendOutcome::Remote { status_code, body } => HttpResult::new(status_code, body),
            SendOutcome::LocalTransportFailure(msg) | SendOutcome::ResponseFramingFailure(msg) => {
                HttpResult::local_failure(&msg)
            }
        }
    }
}

impl fmt::Display for HttpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status code: {}", self.status_code)?;
        if self.body.is_empty() {
            write!(f, "Response body: (empty)")
        } else {
            write!(f, "Response body: {}", self.body)
        }
    }
}
