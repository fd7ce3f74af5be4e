//! Single-shot delivery: connect, optional TLS, send, read until close, parse.

use super::observer::{DeliveryObserver, Phase, TracingObserver};
use super::outcome::{HttpResult, SendOutcome};
use super::{request, SmsRequest};
use crate::config::GatewayConfig;
use crate::http::session::FdSessionOps;
use crate::http::tls::TlsConfig;
use crate::http::{self, parser, HttpClient, HttpResponse, SessionOps};
use crate::net::{self, HostPort};
use std::time::Duration;

/// Deliver `raw_request` to `target` and parse the reply
///
/// Never fails: every error ends up in the returned [`SendOutcome`]. The
/// connection is closed before this returns, whatever the path.
pub fn send<O: DeliveryObserver>(
    raw_request: &[u8],
    target: &HostPort,
    use_ssl: bool,
    timeout: Option<Duration>,
    observer: O,
) -> SendOutcome {
    let outcome = match exchange(raw_request, target, use_ssl, timeout, &observer) {
        Ok(response) => {
            observer.on_phase(Phase::Done);
            SendOutcome::from(response)
        }
        Err(e) => {
            observer.on_phase(Phase::Failed);
            SendOutcome::from(e)
        }
    };

    observer.on_outcome(&outcome);
    outcome
}

fn exchange<O: DeliveryObserver>(
    raw_request: &[u8],
    target: &HostPort,
    use_ssl: bool,
    timeout: Option<Duration>,
    observer: &O,
) -> http::Result<HttpResponse> {
    observer.on_phase(Phase::Connecting);
    let stream = net::connect(target, timeout)?;

    if use_ssl {
        observer.on_phase(Phase::TlsHandshake);
        let tls = TlsConfig::client()?
            .servername(target.host())
            .handshake_timeout(timeout)
            .build();
        let session = tls.connect(stream)?;
        tracing::debug!(version = session.version(), "TLS session established");

        round_trip(HttpClient::new(session), raw_request, timeout, observer)
    } else {
        round_trip(
            HttpClient::new(FdSessionOps::new(stream)),
            raw_request,
            timeout,
            observer,
        )
    }
}

fn round_trip<S: SessionOps, O: DeliveryObserver>(
    mut client: HttpClient<S>,
    raw_request: &[u8],
    timeout: Option<Duration>,
    observer: &O,
) -> http::Result<HttpResponse> {
    client.set_timeout(timeout);

    observer.on_phase(Phase::Sending);
    observer.on_request(raw_request);
    client.send_raw(raw_request)?;

    observer.on_phase(Phase::Receiving);
    let raw_response = client.receive_until_close()?;
    observer.on_response(&raw_response);

    if let Err(e) = client.close() {
        tracing::debug!(error = %e, "error closing connection");
    }

    observer.on_phase(Phase::Parsing);
    parser::parse_response(&raw_response)
}

/// Sends SMS messages through one configured gateway
pub struct SmsClient<O: DeliveryObserver = TracingObserver> {
    config: GatewayConfig,
    observer: O,
}

impl SmsClient {
    /// Client that logs through `tracing`
    pub fn new(config: GatewayConfig) -> Self {
        SmsClient::with_observer(config, TracingObserver)
    }
}

impl<O: DeliveryObserver> SmsClient<O> {
    pub fn with_observer(config: GatewayConfig, observer: O) -> Self {
        SmsClient { config, observer }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Deliver one message and report what happened
    pub fn send(&self, sms: &SmsRequest) -> SendOutcome {
        let wire = request::build(&self.config, sms);

        let target = match HostPort::parse(&self.config.address) {
            Ok(target) => target,
            Err(e) => {
                self.observer.on_phase(Phase::Connecting);
                self.observer.on_phase(Phase::Failed);
                let outcome = SendOutcome::from(http::Error::from(e));
                self.observer.on_outcome(&outcome);
                return outcome;
            }
        };

        tracing::info!(
            host = target.host(),
            port = target.port(),
            use_ssl = self.config.use_ssl,
            recipient = %sms.recipient,
            "sending SMS"
        );

        send(
            &wire,
            &target,
            self.config.use_ssl,
            self.config.timeout(),
            &self.observer,
        )
    }

    /// Deliver one message, collapsing local failures to the 500 sentinel
    pub fn send_sms(&self, sms: &SmsRequest) -> HttpResult {
        self.send(sms).into()
    }
}
