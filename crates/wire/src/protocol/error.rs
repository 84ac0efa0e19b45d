use std::io;
use thiserror::Error;

/// Errors raised while a message travels from the transport towards the core.
///
/// The transport's decoder records one of these on a [`WireRequest`](crate::protocol::WireRequest)
/// when it could not decode the message, and pushes one through a
/// [`PayloadSender`](crate::protocol::PayloadSender) when the body itself turns out to be broken.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid http version: {0:?}")]
    InvalidVersion(String),

    #[error("invalid http method: {0:?}")]
    InvalidMethod(String),

    #[error("invalid http uri: {0:?}")]
    InvalidUri(String),

    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("invalid websocket frame: {reason}")]
    InvalidFrame { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn invalid_frame<S: ToString>(str: S) -> Self {
        Self::InvalidFrame { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Errors raised while a converted message is written back to the transport.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
