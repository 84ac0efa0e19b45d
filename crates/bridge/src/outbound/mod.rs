//! Framework response to wire response.
//!
//! Decides which of the response's headers reach the wire, which framing the body
//! gets, and whether the body is forwarded at all.

mod framing;

pub use framing::{TransferFraming, decide_framing};

use crate::error::{Component, ConvertError};
use crate::model::{Headers, RequestHead, Response};
use framing::declares_chunked;
use http::{Method, StatusCode, Version, header};
use http_body_util::BodyExt;
use micro_wire::protocol::{SendError, WireBody, WireHeaders, WireResponse, WireResponseHead, WireVersion};
use tracing::trace;

/// Converts `response`, answering `request`, into a wire response.
///
/// `date` is the value for a `Date` header, used when the application did not set one.
/// Fails only when the request's version is not one the wire can express.
pub fn convert_response(request: &RequestHead, response: Response, date: &str) -> Result<WireResponse, ConvertError> {
    let (version, minor_is_zero) = wire_version(request.version())?;
    let (status, headers, body) = response.into_parts();

    let mut head = WireResponseHead::new(version, status);
    copy_headers(&headers, head.headers_mut());

    let body = if forbids_entity(status) || request.method() == Method::HEAD {
        if request.method() == Method::HEAD {
            echo_head_framing(&headers, minor_is_zero, head.headers_mut());
        }
        // never polled, the application's body is dropped here
        WireBody::empty()
    } else {
        let framing = decide_framing(version, &headers, minor_is_zero);
        trace!(?framing, status = status.as_u16(), "response framing");
        framing.write_to(head.headers_mut());
        WireBody::Streamed(body.map_err(SendError::invalid_body).boxed_unsync())
    };

    if !head.headers().contains(header::DATE.as_str()) {
        head.headers_mut().add("Date", date);
    }

    let connection = request.headers().get_all(header::CONNECTION.as_str()).collect::<Vec<_>>();
    if !connection.is_empty() {
        head.headers_mut().set("Connection", connection.join(", "));
    } else if minor_is_zero {
        head.headers_mut().set("Connection", "close");
    }

    Ok(WireResponse::new(head, body))
}

/// Maps the request's version onto the wire, flagging HTTP/1.0.
pub(crate) fn wire_version(version: Version) -> Result<(WireVersion, bool), ConvertError> {
    match version {
        Version::HTTP_11 => Ok((WireVersion::HTTP_11, false)),
        Version::HTTP_10 => Ok((WireVersion::HTTP_10, true)),
        other => {
            let version = WireVersion::parse(&format!("{other:?}")).map_err(|e| ConvertError::unparsable(Component::Version, e))?;
            Ok((version, false))
        }
    }
}

fn forbids_entity(status: StatusCode) -> bool {
    status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED
}

/// Everything except the framing headers, which are decided separately.
fn copy_headers(from: &Headers, to: &mut WireHeaders) {
    for (name, value) in from.iter() {
        if name.eq_ignore_ascii_case(header::TRANSFER_ENCODING.as_str()) || name.eq_ignore_ascii_case(header::CONTENT_LENGTH.as_str()) {
            continue;
        }
        to.add(name, value);
    }
}

/// A HEAD response repeats the framing the application declared, and adds none of its own.
fn echo_head_framing(from: &Headers, minor_is_zero: bool, to: &mut WireHeaders) {
    if declares_chunked(from) && !minor_is_zero {
        to.add("Transfer-Encoding", "chunked");
    } else if let Some(length) = from.get(header::CONTENT_LENGTH.as_str()) {
        to.add("Content-Length", length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BodyStream;
    use bytes::Bytes;
    use futures::stream;
    use http::Uri;
    use std::io;

    const DATE: &str = "Sun, 18 Oct 2026 08:00:00 GMT";

    fn request(method: Method, version: Version, headers: &[(&str, &str)]) -> RequestHead {
        RequestHead::new(method, Uri::from_static("/"), version, headers.iter().copied().collect())
    }

    fn response(status: StatusCode, headers: &[(&str, &str)], body: impl Into<BodyStream>) -> Response {
        Response::new(status, headers.iter().copied().collect(), body)
    }

    fn names(wire: &WireResponse) -> Vec<String> {
        wire.headers().iter().map(|(n, _)| n.to_ascii_lowercase()).collect()
    }

    async fn body_of(wire: WireResponse) -> Bytes {
        match wire.into_parts().1 {
            WireBody::Full(bytes) => bytes,
            WireBody::Streamed(body) => body.collect().await.unwrap().to_bytes(),
        }
    }

    #[tokio::test]
    async fn head_never_carries_a_body() {
        let req = request(Method::HEAD, Version::HTTP_11, &[]);
        let wire = convert_response(&req, response(StatusCode::OK, &[("Content-Length", "11")], "hello world"), DATE).unwrap();

        assert!(wire.body().is_full());
        assert_eq!(wire.headers().get("content-length"), Some("11"));
        assert!(!wire.headers().contains("transfer-encoding"));
        assert!(body_of(wire).await.is_empty());
    }

    #[test]
    fn head_echoes_chunked_except_for_http_10() {
        let declared = [("Transfer-Encoding", "gzip, chunked"), ("Content-Length", "40")];

        let wire = convert_response(&request(Method::HEAD, Version::HTTP_11, &[]), response(StatusCode::OK, &declared, ()), DATE).unwrap();
        assert_eq!(wire.headers().get_all("Transfer-Encoding").collect::<Vec<_>>(), vec!["chunked"]);
        assert!(!wire.headers().contains("Content-Length"));

        let wire = convert_response(&request(Method::HEAD, Version::HTTP_10, &[]), response(StatusCode::OK, &declared, ()), DATE).unwrap();
        assert_eq!(wire.headers().get("Content-Length"), Some("40"));
        assert!(!wire.headers().contains("Transfer-Encoding"));
    }

    #[test]
    fn head_without_declared_framing_adds_none() {
        let wire = convert_response(&request(Method::HEAD, Version::HTTP_11, &[]), response(StatusCode::OK, &[], "body"), DATE).unwrap();
        assert!(!wire.headers().contains("Content-Length"));
        assert!(!wire.headers().contains("Transfer-Encoding"));
    }

    #[tokio::test]
    async fn no_content_drops_framing_and_body() {
        let declared = [("Content-Length", "3"), ("Transfer-Encoding", "chunked"), ("X-Request-Id", "7")];
        let wire = convert_response(&request(Method::GET, Version::HTTP_11, &[]), response(StatusCode::NO_CONTENT, &declared, "abc"), DATE).unwrap();

        assert_eq!(names(&wire), vec!["x-request-id", "date"]);
        assert!(body_of(wire).await.is_empty());
    }

    #[tokio::test]
    async fn length_wins_over_non_chunked_coding() {
        let declared = [("Content-Length", "5"), ("Transfer-Encoding", "gzip")];
        let wire = convert_response(&request(Method::GET, Version::HTTP_11, &[]), response(StatusCode::OK, &declared, "hello"), DATE).unwrap();

        assert_eq!(wire.headers().get("Content-Length"), Some("5"));
        assert!(!wire.headers().contains("Transfer-Encoding"));
        assert_eq!(body_of(wire).await, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn streams_chunked_without_declared_length() {
        let chunks = (0..5).map(|i| Ok::<_, io::Error>(Bytes::from(format!("chunk-{i};"))));
        let body = BodyStream::from_stream(stream::iter(chunks));
        let wire = convert_response(&request(Method::GET, Version::HTTP_11, &[]), response(StatusCode::OK, &[], body), DATE).unwrap();

        assert!(wire.body().is_streamed());
        assert_eq!(wire.headers().get("Transfer-Encoding"), Some("chunked"));
        assert!(!wire.headers().contains("Content-Length"));
        assert_eq!(body_of(wire).await, Bytes::from_static(b"chunk-0;chunk-1;chunk-2;chunk-3;chunk-4;"));
    }

    #[test]
    fn http_10_without_length_is_close_delimited() {
        let wire = convert_response(&request(Method::GET, Version::HTTP_10, &[]), response(StatusCode::OK, &[], "x"), DATE).unwrap();

        assert_eq!(wire.version(), WireVersion::HTTP_10);
        assert!(!wire.headers().contains("Content-Length"));
        assert!(!wire.headers().contains("Transfer-Encoding"));
        assert_eq!(wire.headers().get("Connection"), Some("close"));
    }

    #[test]
    fn connection_header() {
        let wire = convert_response(&request(Method::GET, Version::HTTP_11, &[]), response(StatusCode::OK, &[], ()), DATE).unwrap();
        assert!(!wire.headers().contains("Connection"));

        let wire = convert_response(&request(Method::GET, Version::HTTP_10, &[("Connection", "keep-alive")]), response(StatusCode::OK, &[("Connection", "close")], ()), DATE).unwrap();
        assert_eq!(wire.headers().get_all("connection").collect::<Vec<_>>(), vec!["keep-alive"]);
    }

    #[test]
    fn date_is_added_only_when_absent() {
        let wire = convert_response(&request(Method::GET, Version::HTTP_11, &[]), response(StatusCode::OK, &[], ()), DATE).unwrap();
        assert_eq!(wire.headers().get("Date"), Some(DATE));

        let own = "Thu, 01 Jan 1970 00:00:00 GMT";
        let wire = convert_response(&request(Method::GET, Version::HTTP_11, &[]), response(StatusCode::OK, &[("date", own)], ()), DATE).unwrap();
        assert_eq!(wire.headers().get_all("Date").collect::<Vec<_>>(), vec![own]);
    }

    #[test]
    fn other_versions_go_through_the_wire_parser() {
        let wire = convert_response(&request(Method::GET, Version::HTTP_2, &[]), response(StatusCode::OK, &[], ()), DATE).unwrap();
        assert_eq!(wire.version().to_string(), "HTTP/2.0");
        assert!(!wire.headers().contains("Transfer-Encoding"));
    }
}
