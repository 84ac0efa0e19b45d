use crate::model::{Attributes, BodyStream, Headers};
use http::{Method, Uri, Version};

/// Everything about a request except its body.
///
/// Cheap to clone: headers and attributes are shared.
#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    uri: Uri,
    version: Version,
    headers: Headers,
    attributes: Attributes,
}

impl RequestHead {
    pub fn new(method: Method, uri: Uri, version: Version, headers: Headers) -> Self {
        Self { method, uri, version, headers, attributes: Attributes::empty() }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

#[derive(Debug)]
pub struct Request {
    head: RequestHead,
    body: BodyStream,
}

impl Request {
    pub fn new(head: RequestHead, body: BodyStream) -> Self {
        Self { head, body }
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn method(&self) -> &Method {
        self.head.method()
    }

    pub fn uri(&self) -> &Uri {
        self.head.uri()
    }

    pub fn version(&self) -> Version {
        self.head.version()
    }

    pub fn headers(&self) -> &Headers {
        self.head.headers()
    }

    pub fn attributes(&self) -> &Attributes {
        self.head.attributes()
    }

    /// Splits off the body; the head can still be kept around to convert the response.
    pub fn into_parts(self) -> (RequestHead, BodyStream) {
        (self.head, self.body)
    }
}
