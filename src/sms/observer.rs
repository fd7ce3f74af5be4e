//! Progress reporting for a delivery
//!
//! The client never touches global logger state itself; it reports to a
//! [`DeliveryObserver`]. [`TracingObserver`] forwards to `tracing`.

use super::SendOutcome;
use std::fmt;
use std::sync::Mutex;

/// Stages of one delivery
///
/// `Connecting → TlsHandshake (TLS only) → Sending → Receiving → Parsing →
/// Done`. Any stage may end in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connecting,
    TlsHandshake,
    Sending,
    Receiving,
    Parsing,
    Done,
    Failed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Connecting => "connecting",
            Phase::TlsHandshake => "tls_handshake",
            Phase::Sending => "sending",
            Phase::Receiving => "receiving",
            Phase::Parsing => "parsing",
            Phase::Done => "done",
            Phase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives progress of a delivery
pub trait DeliveryObserver {
    /// Called on entering each phase
    fn on_phase(&self, phase: Phase);

    /// Raw request bytes, just before they are written
    fn on_request(&self, _wire: &[u8]) {}

    /// Raw response bytes, before parsing
    fn on_response(&self, _raw: &[u8]) {}

    /// Called once with the final outcome
    fn on_outcome(&self, outcome: &SendOutcome);
}

impl<O: DeliveryObserver + ?Sized> DeliveryObserver for &O {
    fn on_phase(&self, phase: Phase) {
        (**self).on_phase(phase)
    }

    fn on_request(&self, wire: &[u8]) {
        (**self).on_request(wire)
    }

    fn on_response(&self, raw: &[u8]) {
        (**self).on_response(raw)
    }

    fn on_outcome(&self, outcome: &SendOutcome) {
        (**self).on_outcome(outcome)
    }
}

/// Observer that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DeliveryObserver for TracingObserver {
    fn on_phase(&self, phase: Phase) {
        tracing::debug!(phase = %phase, "delivery phase");
    }

    fn on_request(&self, wire: &[u8]) {
        tracing::debug!(
            bytes = wire.len(),
            request = %String::from_utf8_lossy(wire),
            "sending request"
        );
    }

    fn on_response(&self, raw: &[u8]) {
        tracing::debug!(
            bytes = raw.len(),
            response = %String::from_utf8_lossy(raw),
            "received response"
        );
    }

    fn on_outcome(&self, outcome: &SendOutcome) {
        match outcome {
            SendOutcome::Remote { status_code, .. } => {
                tracing::info!(status_code, "gateway responded");
            }
            SendOutcome::LocalTransportFailure(msg) => {
                tracing::error!(error = %msg, "error while sending request");
            }
            SendOutcome::ResponseFramingFailure(msg) => {
                tracing::error!(error = %msg, "error while parsing response");
            }
        }
    }
}

/// Observer that keeps everything it is told
#[derive(Debug, Default)]
pub struct RecordingObserver {
    phases: Mutex<Vec<Phase>>,
    request: Mutex<Option<Vec<u8>>>,
    outcome: Mutex<Option<SendOutcome>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phases in the order they were entered
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Request bytes, if the delivery got as far as sending
    pub fn request(&self) -> Option<Vec<u8>> {
        self.request.lock().ok().and_then(|r| r.clone())
    }

    pub fn outcome(&self) -> Option<SendOutcome> {
        self.outcome.lock().ok().and_then(|o| o.clone())
    }
}

impl DeliveryObserver for RecordingObserver {
    fn on_phase(&self, phase: Phase) {
        if let Ok(mut phases) = self.phases.lock() {
            phases.push(phase);
        }
    }

    fn on_request(&self, wire: &[u8]) {
        if let Ok(mut request) = self.request.lock() {
            *request = Some(wire.to_vec());
        }
    }

    fn on_outcome(&self, outcome: &SendOutcome) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = Some(outcome.clone());
        }
    }
}
