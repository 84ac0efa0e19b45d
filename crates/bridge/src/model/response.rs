use crate::model::{BodyStream, Headers, WebSocketUpgrade};
use http::StatusCode;

#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: BodyStream,
    upgrade: Option<WebSocketUpgrade>,
}

impl Response {
    pub fn new(status: StatusCode, headers: Headers, body: impl Into<BodyStream>) -> Self {
        Self { status, headers, body: body.into(), upgrade: None }
    }

    /// A response with no headers and an empty body.
    pub fn with_status(status: StatusCode) -> Self {
        Self::new(status, Headers::empty(), BodyStream::empty())
    }

    pub fn ok(body: impl Into<BodyStream>) -> Self {
        Self::new(StatusCode::OK, Headers::empty(), body)
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<BodyStream>) -> Self {
        self.body = body.into();
        self
    }

    /// Attaches an upgrade context, asking for the connection to switch to WebSocket.
    pub fn with_upgrade(mut self, upgrade: WebSocketUpgrade) -> Self {
        self.upgrade = Some(upgrade);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &BodyStream {
        &self.body
    }

    pub fn upgrade(&self) -> Option<&WebSocketUpgrade> {
        self.upgrade.as_ref()
    }

    pub fn take_upgrade(&mut self) -> Option<WebSocketUpgrade> {
        self.upgrade.take()
    }

    pub fn into_parts(self) -> (StatusCode, Headers, BodyStream) {
        (self.status, self.headers, self.body)
    }
}
