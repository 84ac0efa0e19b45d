//! Wire body handling.
//!
//! A wire message carries its body in exactly one of two modes, chosen when the
//! message is built and never changed afterwards:
//!
//! - **Full**: the transport already holds every byte of the body in one buffer.
//! - **Streamed**: the body arrives over time through a push-based source that ends
//!   with an explicit end-of-stream signal; the total length is not known up front.
//!
//! For requests the streamed source is a [`PayloadSource`], fed by the transport
//! through its [`PayloadSender`]. For responses it is a boxed [`http_body::Body`]
//! that the response writer pulls from.

mod body_channel;

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;

use crate::protocol::SendError;

pub use body_channel::PayloadSender;
pub use body_channel::PayloadSource;
pub use body_channel::payload_channel;

/// Body of a response on its way to the transport.
pub type ResponseBody = UnsyncBoxBody<Bytes, SendError>;

#[derive(Debug)]
pub enum WireBody<S> {
    Full(Bytes),
    Streamed(S),
}

impl<S> WireBody<S> {
    pub fn empty() -> Self {
        WireBody::Full(Bytes::new())
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, WireBody::Full(_))
    }

    #[inline]
    pub fn is_streamed(&self) -> bool {
        matches!(self, WireBody::Streamed(_))
    }

    /// Returns the buffered bytes of a full body.
    pub fn as_full(&self) -> Option<&Bytes> {
        match self {
            WireBody::Full(bytes) => Some(bytes),
            WireBody::Streamed(_) => None,
        }
    }
}
