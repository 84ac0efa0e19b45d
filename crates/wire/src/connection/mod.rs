//! Writing converted responses back onto a connection.
//!
//! - [`ResponseWriter`]: serializes a [`WireResponse`](crate::protocol::WireResponse)
//!   onto any `AsyncWrite`, streaming bodies frame by frame

mod response_writer;

pub use response_writer::ResponseWriter;
