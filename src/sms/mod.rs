//! SMS delivery over the gateway's `/send_sms` endpoint
//!
//! - [`request`] turns a [`GatewayConfig`](crate::GatewayConfig) and an
//!   [`SmsRequest`] into the exact request bytes
//! - [`client`] connects, sends, reads and parses, reporting progress to a
//!   [`DeliveryObserver`]
//! - [`outcome`] holds the typed result and its printable [`HttpResult`] form

pub mod client;
pub mod observer;
pub mod outcome;
pub mod request;

pub use client::{send, SmsClient};
pub use observer::{DeliveryObserver, Phase, RecordingObserver, TracingObserver};
pub use outcome::{HttpResult, SendOutcome};

use serde::Serialize;

/// One message to deliver
///
/// Fields go into the JSON body unchanged; the gateway does any validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsRequest {
    pub sender: String,
    pub recipient: String,
    pub message: String,
}

impl SmsRequest {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SmsRequest {
            sender: sender.into(),
            recipient: recipient.into(),
            message: message.into(),
        }
    }
}
