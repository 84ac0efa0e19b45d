use crate::codec::body::PayloadEncoder;
use crate::codec::header::HeaderEncoder;
use crate::protocol::{Message, SendError, WireHeaders, WireResponseHead};
use bytes::{Buf, Bytes, BytesMut};
use http::{StatusCode, header};
use std::io;
use std::io::ErrorKind;
use tokio_util::codec::Encoder;
use tracing::error;

/// Encoder for wire responses.
///
/// A [`Message::Header`] starts a response and selects the payload encoding from the
/// framing headers the head declares; the following [`Message::Payload`] items are
/// framed accordingly until [`PayloadItem::Eof`](crate::protocol::PayloadItem::Eof).
#[derive(Debug)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
    payload_encoder: Option<PayloadEncoder>,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Encodes a response whose body is already buffered.
    ///
    /// The bytes are written as they are: a buffered body is only ever produced together
    /// with the head that describes it, including a `HEAD` response whose
    /// `Content-Length` describes a body that is never sent.
    pub fn encode_full(&mut self, head: &WireResponseHead, body: &Bytes, dst: &mut BytesMut) -> Result<(), SendError> {
        if self.payload_encoder.is_some() {
            error!("expect payload item but receive response head");
            return Err(io::Error::from(ErrorKind::InvalidInput).into());
        }
        self.header_encoder.encode(head, dst)?;
        dst.extend_from_slice(body);
        Ok(())
    }

    /// Returns true while a streamed body is being encoded.
    pub fn in_body(&self) -> bool {
        self.payload_encoder.is_some()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder, payload_encoder: None }
    }
}

impl<D: Buf> Encoder<Message<WireResponseHead, D>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Message<WireResponseHead, D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Header(head) => {
                if self.payload_encoder.is_some() {
                    error!("expect payload item but receive response head");
                    return Err(io::Error::from(ErrorKind::InvalidInput).into());
                }

                let payload_encoder = parse_payload_encoder(&head);
                self.header_encoder.encode(&head, dst)?;
                if !payload_encoder.is_empty() {
                    self.payload_encoder = Some(payload_encoder);
                }
                Ok(())
            }

            Message::Payload(payload_item) => {
                let payload_encoder = if let Some(encoder) = &mut self.payload_encoder {
                    encoder
                } else {
                    if payload_item.is_eof() {
                        // body-less head, nothing left to close
                        return Ok(());
                    }
                    error!("expect response header but receive payload item");
                    return Err(io::Error::from(ErrorKind::InvalidInput).into());
                };

                let result = payload_encoder.encode(payload_item, dst);

                if payload_encoder.is_finish() {
                    self.payload_encoder.take();
                }

                result
            }
        }
    }
}

fn parse_payload_encoder(head: &WireResponseHead) -> PayloadEncoder {
    let status = head.status();
    if status.is_informational() || status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED {
        return PayloadEncoder::empty();
    }

    let headers = head.headers();
    if is_chunked(headers) {
        return PayloadEncoder::chunked();
    }

    match content_length(headers) {
        Some(0) => PayloadEncoder::empty(),
        Some(length) => PayloadEncoder::fix_length(length),
        None => PayloadEncoder::until_close(),
    }
}

/// The message is chunked when `chunked` is the final transfer-coding applied.
fn is_chunked(headers: &WireHeaders) -> bool {
    headers
        .get_all(header::TRANSFER_ENCODING.as_str())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|coding| !coding.is_empty())
        .last()
        .is_some_and(|coding| coding.eq_ignore_ascii_case("chunked"))
}

fn content_length(headers: &WireHeaders) -> Option<u64> {
    headers.get(header::CONTENT_LENGTH.as_str()).and_then(|value| value.trim().parse().ok())
}
