//! WebSocket upgrade bridge.
//!
//! A response without an upgrade context is converted as usual. A response with one
//! becomes a `101 Switching Protocols` plus a [`WebSocketProcessor`] when the request
//! asked for a WebSocket over HTTP/1.1 and the handshake checks out. Otherwise the
//! application's failure response, or the response itself, is sent instead and the
//! connection stays plain HTTP.

mod handshake;
mod processor;
mod translate;

pub use processor::WebSocketProcessor;
pub use translate::{to_framework, to_wire};

use crate::config::BridgeConfig;
use crate::error::ConvertError;
use crate::model::{RequestHead, Response, WebSocketUpgrade};
use crate::outbound::{convert_response, wire_version};
use handshake::Handshake;
use http::{StatusCode, Version, header};
use micro_wire::protocol::{WireBody, WireResponse, WireResponseHead};
use micro_wire::websocket::WireUpgrade;
use tracing::{debug, warn};

/// What goes back to the transport for one exchange.
#[derive(Debug)]
pub enum WireOutcome {
    Response(WireResponse),
    Upgrade(WireUpgrade),
}

impl WireOutcome {
    pub fn is_upgrade(&self) -> bool {
        matches!(self, WireOutcome::Upgrade(_))
    }

    /// The response to write first: the whole answer, or the `101` of an upgrade.
    pub fn response(&self) -> &WireResponse {
        match self {
            WireOutcome::Response(response) => response,
            WireOutcome::Upgrade(upgrade) => upgrade.response(),
        }
    }
}

/// Converts a response that may ask for a WebSocket upgrade.
pub fn convert_exchange(request: &RequestHead, mut response: Response, date: &str, config: &BridgeConfig) -> Result<WireOutcome, ConvertError> {
    let Some(upgrade) = response.take_upgrade() else {
        return convert_response(request, response, date).map(WireOutcome::Response);
    };

    if !request.headers().contains_token(header::UPGRADE.as_str(), "websocket") || request.version() == Version::HTTP_10 {
        debug!(version = ?request.version(), "websocket upgrade not requested, falling back");
        return fall_back(request, response, upgrade, date);
    }

    let handshake = match Handshake::accept(request, config) {
        Ok(handshake) => handshake,
        Err(e) => {
            warn!(cause = %e, "websocket handshake failed, falling back");
            return fall_back(request, response, upgrade, date);
        }
    };
    debug!(location = %handshake.location, "websocket handshake accepted");

    let (version, _) = wire_version(request.version())?;
    let mut head = WireResponseHead::new(version, StatusCode::SWITCHING_PROTOCOLS);
    head.headers_mut()
        .add("Upgrade", "websocket")
        .add("Connection", "Upgrade")
        .add("Sec-WebSocket-Accept", handshake.accept_key)
        .add("Date", date);

    let (to_app, from_app) = upgrade.into_pipes();
    let processor = WebSocketProcessor::new(to_app, from_app, config.max_frame_payload_len());
    let response = WireResponse::new(head, WireBody::empty());
    Ok(WireOutcome::Upgrade(WireUpgrade::new(response, config.max_frame_payload_len(), Box::new(processor))))
}

fn fall_back(request: &RequestHead, response: Response, mut upgrade: WebSocketUpgrade, date: &str) -> Result<WireOutcome, ConvertError> {
    let response = upgrade.take_failure_response().unwrap_or(response);
    convert_response(request, response, date).map(WireOutcome::Response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Headers;
    use http::{Method, Uri};

    const DATE: &str = "Sun, 18 Oct 2026 08:00:00 GMT";

    fn request(version: Version, headers: &[(&str, &str)]) -> RequestHead {
        let headers: Headers = headers.iter().copied().collect();
        RequestHead::new(Method::GET, Uri::from_static("/ws"), version, headers)
    }

    fn upgrade_headers() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Host", "localhost:8080"),
            ("Connection", "keep-alive, Upgrade"),
            ("Upgrade", "WebSocket"),
            ("Sec-WebSocket-Version", "13"),
            ("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ=="),
        ]
    }

    fn upgrading_response(failure: Option<Response>) -> Response {
        let (upgrade, _session) = WebSocketUpgrade::channel(1);
        let upgrade = match failure {
            Some(failure) => upgrade.with_failure_response(failure),
            None => upgrade,
        };
        Response::with_status(StatusCode::OK).with_upgrade(upgrade)
    }

    #[test]
    fn plain_response_is_not_an_upgrade() {
        let outcome = convert_exchange(&request(Version::HTTP_11, &upgrade_headers()), Response::ok("hi"), DATE, &BridgeConfig::default()).unwrap();
        assert!(!outcome.is_upgrade());
        assert_eq!(outcome.response().status(), StatusCode::OK);
    }

    #[test]
    fn accepted_upgrade() {
        let outcome = convert_exchange(&request(Version::HTTP_11, &upgrade_headers()), upgrading_response(None), DATE, &BridgeConfig::default()).unwrap();

        let WireOutcome::Upgrade(upgrade) = outcome else { panic!("expected an upgrade") };
        let response = upgrade.response();
        assert_eq!(response.status(), StatusCode::SWITCHING_PROTOCOLS);
        assert_eq!(response.headers().get("Upgrade"), Some("websocket"));
        assert_eq!(response.headers().get("Connection"), Some("Upgrade"));
        assert_eq!(response.headers().get("Sec-WebSocket-Accept"), Some("s3pPLMBiTxaQ9kYGzzhZRbK+xOo="));
        assert_eq!(response.headers().get("Date"), Some(DATE));
        assert!(response.body().is_full());
        assert_eq!(upgrade.max_frame_payload_len(), BridgeConfig::DEFAULT_MAX_FRAME_PAYLOAD_LEN);
    }

    #[test]
    fn falls_back_without_upgrade_header() {
        let headers: Vec<_> = upgrade_headers().into_iter().filter(|(n, _)| *n != "Upgrade").collect();
        let failure = Response::with_status(StatusCode::BAD_REQUEST);

        let outcome = convert_exchange(&request(Version::HTTP_11, &headers), upgrading_response(Some(failure)), DATE, &BridgeConfig::default()).unwrap();
        assert!(!outcome.is_upgrade());
        assert_eq!(outcome.response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn falls_back_for_http_10() {
        let outcome = convert_exchange(&request(Version::HTTP_10, &upgrade_headers()), upgrading_response(None), DATE, &BridgeConfig::default()).unwrap();
        assert!(!outcome.is_upgrade());
        assert_eq!(outcome.response().status(), StatusCode::OK);
    }

    #[test]
    fn failed_handshake_degrades_to_the_failure_response() {
        let headers: Vec<_> = upgrade_headers().into_iter().filter(|(n, _)| *n != "Sec-WebSocket-Key").collect();
        let failure = Response::with_status(StatusCode::UPGRADE_REQUIRED);

        let outcome = convert_exchange(&request(Version::HTTP_11, &headers), upgrading_response(Some(failure)), DATE, &BridgeConfig::default()).unwrap();
        assert_eq!(outcome.response().status(), StatusCode::UPGRADE_REQUIRED);
    }
}
