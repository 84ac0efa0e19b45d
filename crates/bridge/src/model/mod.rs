//! The framework model.
//!
//! Immutable request and response values with a lazily pulled body, as handed to and
//! returned by application logic. Nothing here knows about the transport.

mod attributes;
mod body;
mod headers;
mod request;
mod response;
mod websocket;

pub use attributes::{Attributes, AttributesBuilder, CONNECTION_INFO, SECURE_SESSION};
pub use body::BodyStream;
pub use headers::{Headers, HeadersBuilder};
pub use request::{Request, RequestHead};
pub use response::Response;
pub use websocket::{SessionClosed, WebSocketSession, WebSocketUpgrade, WsFrame, WsReceiver, WsSender};
