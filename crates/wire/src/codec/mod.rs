//! Serialization of wire responses.
//!
//! Decoding requests is the transport's business; what the core hands back is a
//! [`WireResponse`](crate::protocol::WireResponse) that still has to become bytes.
//!
//! # Components
//!
//! - [`ResponseEncoder`]: a `tokio_util` [`Encoder`](tokio_util::codec::Encoder) for
//!   response heads and payload items
//! - head serialization via the [`header`] module
//! - payload framing via the [`body`] module, picked from the head's own
//!   `Transfer-Encoding` / `Content-Length` headers
//!
//! # Example
//!
//! ```
//! use bytes::{Bytes, BytesMut};
//! use http::StatusCode;
//! use micro_wire::codec::ResponseEncoder;
//! use micro_wire::protocol::{Message, PayloadItem, WireResponseHead, WireVersion};
//! use tokio_util::codec::Encoder;
//!
//! let mut head = WireResponseHead::new(WireVersion::HTTP_11, StatusCode::OK);
//! head.headers_mut().add("Transfer-Encoding", "chunked");
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut dst = BytesMut::new();
//! encoder.encode(Message::<_, Bytes>::Header(head), &mut dst).unwrap();
//! encoder.encode(Message::<WireResponseHead>::from(Bytes::from_static(b"hi")), &mut dst).unwrap();
//! encoder.encode(Message::<WireResponseHead, Bytes>::Payload(PayloadItem::Eof), &mut dst).unwrap();
//!
//! assert!(dst.ends_with(b"2\r\nhi\r\n0\r\n\r\n"));
//! ```

pub mod body;
pub mod header;
mod response_encoder;

pub use response_encoder::ResponseEncoder;
