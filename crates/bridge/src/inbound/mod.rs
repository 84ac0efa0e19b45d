//! Wire request to framework request.
//!
//! [`convert_request`] never waits on body content. A streamed wire body becomes a
//! [`BodyStream`] that pulls from the transport only when the application reads it,
//! together with a [`CleanupAction`] that releases the transport side if it never does.

mod body;
mod cleanup;

pub use cleanup::CleanupAction;

use crate::attributes::extract_attributes;
use crate::error::{Component, ConvertError};
use crate::model::{BodyStream, Headers, Request, RequestHead};
use body::{InboundBody, SharedSource};
use http::{Method, Uri, Version};
use micro_wire::channel::Channel;
use micro_wire::protocol::{WireBody, WireRequest, WireVersion};
use std::sync::Arc;
use tracing::{error, trace};

/// Converts a decoded wire request.
///
/// Request line tokens are parsed in a fixed order, method then uri then version, and
/// the first failure is returned. Nothing is built for a request that fails.
pub fn convert_request(channel: Arc<dyn Channel>, wire: WireRequest) -> Result<(Request, CleanupAction), ConvertError> {
    let parts = wire.into_parts();

    if let Some(source) = parts.decode_failure {
        error!(cause = %source, "wire request failed to decode");
        return Err(ConvertError::MalformedMessage { source });
    }

    let method = parse_method(&parts.method)?;
    let uri = parse_uri(&parts.uri)?;
    let version = parse_version(&parts.version)?;

    let headers: Headers = parts.headers.iter().collect();
    let attributes = extract_attributes(channel.tls_session().as_ref(), &channel.local_addr(), &channel.remote_addr());
    let head = RequestHead::new(method, uri, version, headers).with_attributes(attributes);

    let (body, cleanup) = match parts.body {
        WireBody::Full(bytes) => (BodyStream::once(bytes), CleanupAction::noop()),
        WireBody::Streamed(source) => {
            let shared = Arc::new(SharedSource::new(source));
            let body = BodyStream::from_body(InboundBody::new(Arc::clone(&shared)));
            (body, CleanupAction::drain(channel, shared))
        }
    };

    trace!(method = %head.method(), uri = %head.uri(), "converted wire request");
    Ok((Request::new(head, body), cleanup))
}

fn parse_method(token: &str) -> Result<Method, ConvertError> {
    Method::from_bytes(token.as_bytes()).map_err(|e| ConvertError::unparsable(Component::Method, format!("{token:?}: {e}")))
}

fn parse_uri(token: &str) -> Result<Uri, ConvertError> {
    token.parse::<Uri>().map_err(|e| ConvertError::unparsable(Component::Uri, format!("{token:?}: {e}")))
}

fn parse_version(token: &str) -> Result<Version, ConvertError> {
    let version = WireVersion::parse(token).map_err(|e| ConvertError::unparsable(Component::Version, e))?;
    match (version.major(), version.minor()) {
        (0, 9) => Ok(Version::HTTP_09),
        (1, 0) => Ok(Version::HTTP_10),
        (1, 1) => Ok(Version::HTTP_11),
        (2, 0) => Ok(Version::HTTP_2),
        (3, 0) => Ok(Version::HTTP_3),
        _ => Err(ConvertError::unparsable(Component::Version, format!("unsupported version {version}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ConnectionInfo;
    use crate::error::BodyError;
    use crate::model::CONNECTION_INFO;
    use bytes::Bytes;
    use http_body_util::BodyExt;
    use micro_wire::channel::ConnectionChannel;
    use micro_wire::protocol::{ParseError, WireHeaders, payload_channel};

    fn channel() -> Arc<dyn Channel> {
        let local: std::net::SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let remote: std::net::SocketAddr = "127.0.0.1:50000".parse().unwrap();
        Arc::new(ConnectionChannel::new(local, remote))
    }

    fn request(method: &str, uri: &str, version: &str, body: WireBody<micro_wire::protocol::PayloadSource>) -> WireRequest {
        let mut headers = WireHeaders::new();
        headers.add("Host", "localhost").add("X-Trace", "a").add("x-trace", "b");
        WireRequest::new(method, uri, version, headers, body)
    }

    #[tokio::test]
    async fn full_body_request() {
        let wire = request("POST", "/submit?x=1", "HTTP/1.1", WireBody::Full(Bytes::from_static(b"payload")));
        let (request, cleanup) = convert_request(channel(), wire).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().path(), "/submit");
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.headers().iter().map(|(n, _)| n).collect::<Vec<_>>(), vec!["Host", "X-Trace", "x-trace"]);
        assert!(request.attributes().get::<ConnectionInfo>(CONNECTION_INFO).is_some());
        assert!(cleanup.is_noop());

        let (_, body) = request.into_parts();
        assert_eq!(body.collect_bytes().await.unwrap(), Bytes::from_static(b"payload"));
    }

    #[tokio::test]
    async fn streamed_body_is_pulled_lazily() {
        let (mut sender, source) = payload_channel(1);
        let wire = request("PUT", "/upload", "HTTP/1.0", WireBody::Streamed(source));

        // nothing has been sent yet, conversion must not wait for it
        let (request, cleanup) = convert_request(channel(), wire).unwrap();
        assert_eq!(request.version(), Version::HTTP_10);
        assert!(!cleanup.is_noop());

        let reader = tokio::spawn(async move { request.into_parts().1.collect_bytes().await });
        sender.send_chunk(Bytes::from_static(b"one,")).await.unwrap();
        sender.send_chunk(Bytes::from_static(b"two")).await.unwrap();
        sender.finish().await.unwrap();

        assert_eq!(reader.await.unwrap().unwrap(), Bytes::from_static(b"one,two"));
    }

    #[tokio::test]
    async fn cleanup_interrupts_a_parked_reader() {
        let (sender, source) = payload_channel(1);
        let channel = channel();
        let (request, cleanup) = convert_request(Arc::clone(&channel), request("POST", "/", "HTTP/1.1", WireBody::Streamed(source))).unwrap();

        let mut body = request.into_parts().1;
        let reader = tokio::spawn(async move { body.frame().await.map(|r| r.map(|_| ())) });
        tokio::task::yield_now().await;

        let closer = tokio::spawn(async move { cleanup.run().await });
        assert!(matches!(reader.await.unwrap(), Some(Err(BodyError::Drained))));
        assert!(!channel.is_open());
        drop(sender);
        assert!(closer.await.unwrap());
    }

    #[test]
    fn decode_failure_is_malformed() {
        let wire = request("GET", "/", "HTTP/1.1", WireBody::empty()).with_decode_failure(ParseError::invalid_header("obs-fold"));
        assert!(matches!(convert_request(channel(), wire), Err(ConvertError::MalformedMessage { .. })));
    }

    #[test]
    fn first_bad_token_wins() {
        let err = convert_request(channel(), request("G E T", "", "HTTP/9", WireBody::empty())).unwrap_err();
        assert_eq!(err.component(), Some(Component::Method));

        let err = convert_request(channel(), request("GET", "", "HTTP/9", WireBody::empty())).unwrap_err();
        assert_eq!(err.component(), Some(Component::Uri));

        let err = convert_request(channel(), request("GET", "/", "HTTP/9", WireBody::empty())).unwrap_err();
        assert_eq!(err.component(), Some(Component::Version));

        let err = convert_request(channel(), request("GET", "/", "HTTP/4.2", WireBody::empty())).unwrap_err();
        assert_eq!(err.component(), Some(Component::Version));
    }

    #[test]
    fn version_tokens() {
        assert_eq!(parse_version("HTTP/1.0").unwrap(), Version::HTTP_10);
        assert_eq!(parse_version("http/1.1").unwrap(), Version::HTTP_11);
        assert!(parse_version("HTTP/1").is_err());
    }
}
