//! Wire-side HTTP message model.
//!
//! These are the values the transport engine produces and consumes. They are
//! deliberately thin: raw request-line tokens, an append-only header list that keeps
//! the peer's spelling, and a body that is either fully buffered or streamed.
//!
//! # Components
//!
//! - **Messages**: [`WireRequest`] and [`WireResponse`]
//! - **Headers**: [`WireHeaders`], ordered and case-preserving
//! - **Versions**: [`WireVersion`] and its token parser
//! - **Bodies** ([`body`]): [`WireBody`], [`PayloadSender`] and [`PayloadSource`]
//! - **Encoder items**: [`Message`] and [`PayloadItem`]
//! - **Errors**: [`ParseError`] and [`SendError`]

mod message;
pub use message::Message;
pub use message::PayloadItem;

mod headers;
pub use headers::WireHeaders;

mod version;
pub use version::WireVersion;

mod request;
pub use request::WireRequest;
pub use request::WireRequestParts;

mod response;
pub use response::WireResponse;
pub use response::WireResponseHead;

mod error;
pub use error::ParseError;
pub use error::SendError;

pub mod body;
pub use body::PayloadSender;
pub use body::PayloadSource;
pub use body::ResponseBody;
pub use body::WireBody;
pub use body::payload_channel;
