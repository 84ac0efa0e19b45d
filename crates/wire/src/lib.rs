//! The wire model of micro-bridge.
//!
//! This crate describes an HTTP exchange the way a network engine sees it: a request
//! whose request line is still a set of raw tokens, headers kept in arrival order with
//! their original spelling, and a body that is either fully buffered or pushed in
//! chunk by chunk. It is the vocabulary shared by a transport (which accepts
//! connections, decodes requests and writes responses) and `micro-bridge` (which
//! converts these values to and from an immutable framework model).
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use futures::StreamExt;
//! use micro_wire::protocol::{payload_channel, PayloadItem, WireBody, WireHeaders, WireRequest};
//!
//! # tokio_test_block_on(async {
//! let (mut sender, source) = payload_channel(8);
//!
//! let mut headers = WireHeaders::new();
//! headers.add("Host", "example.com").add("Transfer-Encoding", "chunked");
//! let request = WireRequest::new("POST", "/upload", "HTTP/1.1", headers, WireBody::Streamed(source));
//!
//! sender.send_chunk(Bytes::from_static(b"part-1")).await.unwrap();
//! sender.finish().await.unwrap();
//!
//! let WireBody::Streamed(mut source) = request.into_parts().body else { unreachable!() };
//! assert_eq!(source.next().await.unwrap().unwrap(), PayloadItem::Chunk(Bytes::from_static(b"part-1")));
//! assert!(source.next().await.unwrap().unwrap().is_eof());
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: wire requests/responses, headers, versions, bodies and errors
//! - [`channel`]: the connected channel the core sees instead of a socket
//! - [`websocket`]: raw frames, frame pipes and the upgrade response
//! - [`codec`]: serialization of response heads and payloads
//! - [`connection`]: writing a converted response onto an `AsyncWrite`
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - No request decoding: the transport owns the parser

pub mod channel;
pub mod codec;
pub mod connection;
pub mod protocol;
pub mod websocket;

mod utils;
pub(crate) use utils::ensure;
