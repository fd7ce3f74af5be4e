//! sms-relay - single-shot SMS gateway client
//!
//! This crate delivers one SMS message to an HTTP gateway using a small
//! hand-written HTTP/1.1 stack, optionally over TLS.

pub mod config;
pub mod http;
pub mod net;
pub mod sms;

pub use config::{ConfigError, GatewayConfig};
pub use sms::{HttpResult, SendOutcome, SmsClient, SmsRequest};
