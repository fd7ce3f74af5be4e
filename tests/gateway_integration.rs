//! Integration tests for SMS delivery
//!
//! These tests run the full client against a one-shot gateway on a local
//! listener.

use base64::{engine::general_purpose, Engine as _};
use sms_relay::http::parser;
use sms_relay::sms::{Phase, RecordingObserver};
use sms_relay::{GatewayConfig, HttpResult, SendOutcome, SmsClient, SmsRequest};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Read one request off `stream`, using its Content-Length to know when it ends
fn read_request(stream: &mut TcpStream) -> String {
    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf).unwrap();
        received.extend_from_slice(&buf[..n]);
        let complete = parser::expected_length(&received).is_some_and(|t| received.len() >= t);
        if n == 0 || complete {
            return String::from_utf8(received).unwrap();
        }
    }
}

/// Accept one connection, answer with `response` and close
fn one_shot_gateway(response: &'static [u8]) -> (u16, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(response).unwrap();
        request
    });

    (port, handle)
}

fn config_for(port: u16) -> GatewayConfig {
    GatewayConfig::new(format!("127.0.0.1:{}", port), "gateway-user", "pa:ss wörd")
        .with_timeout(Some(Duration::from_secs(2)))
}

fn sms() -> SmsRequest {
    SmsRequest::new("ACME", "+15551234567", "Your code is 1234")
}

#[test]
fn test_request_on_the_wire() {
    let (port, handle) = one_shot_gateway(b"HTTP/1.1 200 OK\r\n\r\n{\"status\":\"queued\"}");

    let result = SmsClient::new(config_for(port)).send_sms(&sms());
    assert_eq!(result, HttpResult::new(200, "{\"status\":\"queued\"}"));

    let request = handle.join().unwrap();
    let (head, body) = request.split_once("\r\n\r\n").unwrap();
    let lines: Vec<_> = head.split("\r\n").collect();

    assert_eq!(lines[0], "POST /send_sms HTTP/1.1");
    assert_eq!(lines[1], format!("Host: 127.0.0.1:{}", port));
    assert_eq!(lines[3], "Content-Type: application/json");
    assert_eq!(lines[4], format!("Content-Length: {}", body.len()));

    let encoded = lines[2].strip_prefix("Authorization: Basic ").unwrap();
    let decoded = String::from_utf8(general_purpose::STANDARD.decode(encoded).unwrap()).unwrap();
    assert_eq!(decoded.split_once(':'), Some(("gateway-user", "pa:ss wörd")));

    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["sender"], "ACME");
    assert_eq!(json["recipient"], "+15551234567");
    assert_eq!(json["message"], "Your code is 1234");
}

#[test]
fn test_status_codes_pass_through() {
    let (port, handle) = one_shot_gateway(b"HTTP/1.1 404 Not Found\r\nX: 1\r\n\r\n{}");

    let result = SmsClient::new(config_for(port)).send_sms(&sms());
    assert_eq!(result, HttpResult::new(404, "{}"));

    handle.join().unwrap();
}

#[test]
fn test_gateway_500_is_distinguishable() {
    let (port, handle) =
        one_shot_gateway(b"HTTP/1.1 500 Internal Server Error\r\n\r\n{\"error\":\"upstream\"}");

    let outcome = SmsClient::new(config_for(port)).send(&sms());
    assert_eq!(
        outcome,
        SendOutcome::Remote {
            status_code: 500,
            body: "{\"error\":\"upstream\"}".to_string()
        }
    );

    handle.join().unwrap();
}

#[test]
fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let outcome = SmsClient::new(config_for(port)).send(&sms());
    assert!(matches!(outcome, SendOutcome::LocalTransportFailure(_)));

    let result = HttpResult::from(outcome);
    assert_eq!(result.status_code, 500);
    assert!(result.body.contains("\"error\""));
}

#[test]
fn test_missing_separator_is_framing_failure() {
    let (port, handle) = one_shot_gateway(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n");

    let outcome = SmsClient::new(config_for(port)).send(&sms());
    assert!(matches!(outcome, SendOutcome::ResponseFramingFailure(_)));
    assert!(outcome.error_message().unwrap().contains("could not parse response"));

    handle.join().unwrap();
}

#[test]
fn test_unresponsive_gateway_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let (done_tx, done_rx) = mpsc::channel::<()>();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        // Never answer, never close
        let _ = done_rx.recv_timeout(Duration::from_secs(10));
    });

    let config = config_for(port).with_timeout(Some(Duration::from_secs(1)));
    let observer = RecordingObserver::new();
    let outcome = SmsClient::with_observer(config, &observer).send(&sms());

    assert_eq!(outcome, SendOutcome::LocalTransportFailure("Timeout".to_string()));
    assert_eq!(
        observer.phases(),
        vec![
            Phase::Connecting,
            Phase::Sending,
            Phase::Receiving,
            Phase::Failed
        ]
    );

    done_tx.send(()).unwrap();
    handle.join().unwrap();
}

#[test]
fn test_keep_alive_gateway_with_content_length() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let (done_tx, done_rx) = mpsc::channel::<()>();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_request(&mut stream);
        stream
            .write_all(b"HTTP/1.1 202 Accepted\r\nContent-Length: 4\r\nConnection: keep-alive\r\n\r\nsent")
            .unwrap();
        let _ = done_rx.recv_timeout(Duration::from_secs(10));
    });

    let result = SmsClient::new(config_for(port)).send_sms(&sms());
    assert_eq!(result, HttpResult::new(202, "sent"));

    done_tx.send(()).unwrap();
    handle.join().unwrap();
}

#[test]
fn test_oversized_content_length_reads_until_close() {
    let (port, handle) = one_shot_gateway(
        b"HTTP/1.1 200 OK\r\nContent-Length: 18446744073709551615\r\n\r\nqueued",
    );

    let result = SmsClient::new(config_for(port)).send_sms(&sms());
    assert_eq!(result, HttpResult::new(200, "queued"));

    handle.join().unwrap();
}

#[test]
fn test_tls_against_plain_gateway_fails_locally() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n");
    });

    let config = config_for(port).with_ssl(true);
    let observer = RecordingObserver::new();
    let outcome = SmsClient::with_observer(config, &observer).send(&sms());

    assert!(matches!(outcome, SendOutcome::LocalTransportFailure(_)));
    assert_eq!(
        observer.phases(),
        vec![Phase::Connecting, Phase::TlsHandshake, Phase::Failed]
    );
    assert_eq!(observer.request(), None);

    handle.join().unwrap();
}

#[test]
fn test_config_file_to_delivery() {
    let (port, handle) = one_shot_gateway(b"HTTP/1.1 200 OK\r\n\r\n");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "address = \"127.0.0.1:{}\"", port).unwrap();
    writeln!(file, "username = \"u\"").unwrap();
    writeln!(file, "password = \"p\"").unwrap();
    writeln!(file, "timeout_secs = 2").unwrap();

    let config = sms_relay::config::load_config(file.path()).unwrap();
    let result = SmsClient::new(config).send_sms(&sms());
    assert_eq!(result.to_string(), "Status code: 200\nResponse body: (empty)");

    let request = handle.join().unwrap();
    assert!(request.contains("Authorization: Basic dTpw\r\n"));
}
