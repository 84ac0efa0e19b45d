use crate::model::{Request, Response};
use async_trait::async_trait;
use std::error::Error;

/// Application logic answering one request.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: Request) -> Result<Response, Box<dyn Error + Send + Sync>>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut, Err> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Err>> + Send,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    async fn call(&self, request: Request) -> Result<Response, Box<dyn Error + Send + Sync>> {
        (self.f)(request).await.map_err(Into::into)
    }
}

/// Turns an async function or closure into a [`Handler`].
pub fn handler_fn<F, Fut, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut,
    Fut: Future<Output = Result<Response, Err>>,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BodyStream, RequestHead};
    use http::{Method, StatusCode, Uri, Version};
    use std::io;

    fn assert_is_handler<T: Handler>(_handler: &T) {
        // no op
    }

    async fn echo(request: Request) -> Result<Response, io::Error> {
        let (_, body) = request.into_parts();
        Ok(Response::ok(body))
    }

    #[tokio::test]
    async fn fn_is_handler() {
        let handler = handler_fn(echo);
        assert_is_handler(&handler);

        let request = Request::new(RequestHead::new(Method::POST, Uri::from_static("/"), Version::HTTP_11, Default::default()), BodyStream::once("ping"));
        let response = handler.call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn closure_errors_are_boxed() {
        let handler = handler_fn(|_request: Request| async { Err::<Response, _>(io::Error::other("boom")) });

        let request = Request::new(RequestHead::new(Method::GET, Uri::from_static("/"), Version::HTTP_11, Default::default()), BodyStream::empty());
        let err = handler.call(request).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
