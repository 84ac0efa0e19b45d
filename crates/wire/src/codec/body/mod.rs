//! Payload encoding for response bodies.
//!
//! - [`ChunkedEncoder`](chunked_encoder::ChunkedEncoder): `Transfer-Encoding: chunked` framing
//! - [`LengthEncoder`](length_encoder::LengthEncoder): `Content-Length` bounded bodies
//! - [`PayloadEncoder`]: picks one of the above, or writes raw bytes until the
//!   connection closes when the head declares neither

mod chunked_encoder;
mod length_encoder;
mod payload_encoder;

pub use payload_encoder::PayloadEncoder;
