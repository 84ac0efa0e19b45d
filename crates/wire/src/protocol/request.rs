//! Wire request as handed over by the transport's decoder.
//!
//! The request line is kept as the raw tokens the decoder saw. Turning them into
//! typed values is the job of whoever consumes the request, so that a bad token
//! surfaces where it can be reported with context.

use crate::protocol::{ParseError, PayloadSource, WireBody, WireHeaders};

#[derive(Debug)]
pub struct WireRequest {
    parts: WireRequestParts,
}

/// The decomposed pieces of a [`WireRequest`].
#[derive(Debug)]
pub struct WireRequestParts {
    pub method: String,
    pub uri: String,
    pub version: String,
    pub headers: WireHeaders,
    pub body: WireBody<PayloadSource>,
    /// Set when the transport's decoder gave up on this message.
    pub decode_failure: Option<ParseError>,
}

impl WireRequest {
    pub fn new(
        method: impl Into<String>,
        uri: impl Into<String>,
        version: impl Into<String>,
        headers: WireHeaders,
        body: WireBody<PayloadSource>,
    ) -> Self {
        Self {
            parts: WireRequestParts {
                method: method.into(),
                uri: uri.into(),
                version: version.into(),
                headers,
                body,
                decode_failure: None,
            },
        }
    }

    /// Marks the request as a decode failure.
    pub fn with_decode_failure(mut self, e: ParseError) -> Self {
        self.parts.decode_failure = Some(e);
        self
    }

    pub fn method(&self) -> &str {
        &self.parts.method
    }

    pub fn uri(&self) -> &str {
        &self.parts.uri
    }

    pub fn version(&self) -> &str {
        &self.parts.version
    }

    pub fn headers(&self) -> &WireHeaders {
        &self.parts.headers
    }

    pub fn body(&self) -> &WireBody<PayloadSource> {
        &self.parts.body
    }

    pub fn is_decode_failure(&self) -> bool {
        self.parts.decode_failure.is_some()
    }

    pub fn into_parts(self) -> WireRequestParts {
        self.parts
    }
}
