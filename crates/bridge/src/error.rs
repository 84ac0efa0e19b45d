use micro_wire::protocol::ParseError;
use std::error::Error as StdError;
use thiserror::Error;

/// A request line token that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Method,
    Uri,
    Version,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Component::Method => "method",
            Component::Uri => "uri",
            Component::Version => "version",
        })
    }
}

/// Hard failures at the protocol boundary.
///
/// These are the only errors conversion surfaces to its caller; the transport is
/// expected to terminate the connection when it sees one.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("malformed message: {source}")]
    MalformedMessage { source: ParseError },

    #[error("unparsable {component}: {reason}")]
    UnparsableComponent { component: Component, reason: String },
}

impl ConvertError {
    pub fn unparsable<S: ToString>(component: Component, reason: S) -> Self {
        Self::UnparsableComponent { component, reason: reason.to_string() }
    }

    pub fn component(&self) -> Option<Component> {
        match self {
            ConvertError::MalformedMessage { .. } => None,
            ConvertError::UnparsableComponent { component, .. } => Some(*component),
        }
    }
}

/// Reasons a WebSocket handshake could not be built.
///
/// Never leaves the bridge: the exchange falls back to the application's failure
/// response and continues as plain HTTP.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("request has no Host header")]
    MissingHost,

    #[error("invalid websocket location {location:?}: {reason}")]
    InvalidLocation { location: String, reason: String },

    #[error("request has no Sec-WebSocket-Key header")]
    MissingKey,

    #[error("unsupported websocket version {0:?}")]
    UnsupportedVersion(Option<String>),

    #[error("origin {0:?} is not allowed")]
    OriginRejected(String),
}

/// Errors observed while pulling a [`BodyStream`](crate::model::BodyStream).
#[derive(Error, Debug)]
pub enum BodyError {
    /// The transport reported a broken body or went away mid-stream.
    #[error("transport failure: {0}")]
    Transport(#[from] ParseError),

    /// The body was drained by its cleanup action before it was read to the end.
    #[error("body has been drained")]
    Drained,

    #[error("application failure: {0}")]
    Application(Box<dyn StdError + Send + Sync>),
}

impl BodyError {
    pub fn application<E>(e: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Application(e.into())
    }
}
