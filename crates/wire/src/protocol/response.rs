//! Wire response handed back to the transport for serialization.
//!
//! The head is built up append-only through [`WireResponseHead::headers_mut`];
//! whatever framing headers it ends up with are written exactly as they are.

use http::StatusCode;

use crate::protocol::{ResponseBody, WireBody, WireHeaders, WireVersion};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponseHead {
    version: WireVersion,
    status: StatusCode,
    headers: WireHeaders,
}

impl WireResponseHead {
    pub fn new(version: WireVersion, status: StatusCode) -> Self {
        Self { version, status, headers: WireHeaders::new() }
    }

    pub fn version(&self) -> WireVersion {
        self.version
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &WireHeaders {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut WireHeaders {
        &mut self.headers
    }
}

#[derive(Debug)]
pub struct WireResponse {
    head: WireResponseHead,
    body: WireBody<ResponseBody>,
}

impl WireResponse {
    pub fn new(head: WireResponseHead, body: WireBody<ResponseBody>) -> Self {
        Self { head, body }
    }

    pub fn head(&self) -> &WireResponseHead {
        &self.head
    }

    pub fn version(&self) -> WireVersion {
        self.head.version
    }

    pub fn status(&self) -> StatusCode {
        self.head.status
    }

    pub fn headers(&self) -> &WireHeaders {
        &self.head.headers
    }

    pub fn body(&self) -> &WireBody<ResponseBody> {
        &self.body
    }

    pub fn into_parts(self) -> (WireResponseHead, WireBody<ResponseBody>) {
        (self.head, self.body)
    }
}
