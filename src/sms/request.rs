//! Request construction for `POST /send_sms`

use super::SmsRequest;
use crate::config::GatewayConfig;
use crate::http::HttpRequest;
use base64::{engine::general_purpose, Engine as _};

/// Path of the gateway's send endpoint
pub const SEND_SMS_PATH: &str = "/send_sms";

/// `Basic <base64(username:password)>`, standard alphabet with padding
///
/// No escaping is applied; CR/LF in the credentials end up on the wire.
pub fn basic_auth(username: &str, password: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
    format!("Basic {}", encoded)
}

/// JSON body with `sender`, `recipient` and `message`
pub fn json_body(sms: &SmsRequest) -> Vec<u8> {
    // Serializing a struct of strings into memory has no failure path
    serde_json::to_vec(sms).unwrap_or_default()
}

/// Build the request for `sms`
///
/// Headers in wire order: `Host` (the configured address verbatim),
/// `Authorization`, `Content-Type`, `Content-Length`.
pub fn build_request(config: &GatewayConfig, sms: &SmsRequest) -> HttpRequest {
    let body = json_body(sms);

    HttpRequest::post(SEND_SMS_PATH)
        .header("Host", config.address.as_str())
        .header("Authorization", basic_auth(&config.username, &config.password))
        .header("Content-Type", "application/json")
        .header("Content-Length", body.len().to_string())
        .body(body)
        .build()
}

/// Exact bytes to send for `sms`
pub fn build(config: &GatewayConfig, sms: &SmsRequest) -> Vec<u8> {
    build_request(config, sms).to_wire()
}
