//! Response head serialization.
//!
//! - [`HeaderEncoder`]: writes the status line and the headers of a
//!   [`WireResponseHead`](crate::protocol::WireResponseHead) in the order they were added

mod header_encoder;

pub use header_encoder::HeaderEncoder;
