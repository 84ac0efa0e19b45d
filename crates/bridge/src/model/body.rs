use crate::error::BodyError;
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http_body::{Body as HttpBody, Frame, SizeHint};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, StreamBody};
use std::error::Error as StdError;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Lazy byte sequence of a framework message.
///
/// A body stream is pulled, never pushed: nothing is produced until a consumer polls it.
/// It has exactly one consumer, since consuming needs the value itself, and it cannot
/// be restarted. After it has yielded its end or an error, every further poll yields
/// end again.
pub struct BodyStream {
    inner: Kind,
}

enum Kind {
    Once(Option<Bytes>),
    Stream(UnsyncBoxBody<Bytes, BodyError>),
    Done,
}

impl BodyStream {
    pub fn empty() -> Self {
        Self { inner: Kind::Once(None) }
    }

    pub fn once(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() { Self::empty() } else { Self { inner: Kind::Once(Some(bytes)) } }
    }

    /// Wraps a stream of chunks; its errors surface as [`BodyError::Application`].
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<Box<dyn StdError + Send + Sync>> + 'static,
    {
        let frames = stream.map_ok(Frame::data).map_err(BodyError::application);
        Self { inner: Kind::Stream(StreamBody::new(frames).boxed_unsync()) }
    }

    pub fn from_body<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes, Error = BodyError> + Send + 'static,
    {
        Self { inner: Kind::Stream(body.boxed_unsync()) }
    }

    /// Reads the rest of the body into one buffer.
    pub async fn collect_bytes(self) -> Result<Bytes, BodyError> {
        Ok(self.collect().await?.to_bytes())
    }
}

impl std::fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            Kind::Once(None) | Kind::Done => "Empty",
            Kind::Once(Some(_)) => "Once",
            Kind::Stream(_) => "Stream",
        };
        f.debug_tuple("BodyStream").field(&kind).finish()
    }
}

impl Default for BodyStream {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for BodyStream {
    fn from(bytes: Bytes) -> Self {
        Self::once(bytes)
    }
}

impl From<String> for BodyStream {
    fn from(value: String) -> Self {
        Self::once(value)
    }
}

impl From<&'static str> for BodyStream {
    fn from(value: &'static str) -> Self {
        Self::once(Bytes::from_static(value.as_bytes()))
    }
}

impl From<()> for BodyStream {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

impl HttpBody for BodyStream {
    type Data = Bytes;
    type Error = BodyError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        match &mut this.inner {
            Kind::Once(option_bytes) => {
                let frame = option_bytes.take().map(|bytes| Ok(Frame::data(bytes)));
                this.inner = Kind::Done;
                Poll::Ready(frame)
            }
            Kind::Stream(body) => match Pin::new(body).poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => Poll::Ready(Some(Ok(frame))),
                Poll::Ready(result) => {
                    this.inner = Kind::Done;
                    Poll::Ready(result)
                }
                Poll::Pending => Poll::Pending,
            },
            Kind::Done => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.inner {
            Kind::Once(option_bytes) => option_bytes.is_none(),
            Kind::Stream(body) => body.is_end_stream(),
            Kind::Done => true,
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            Kind::Once(None) | Kind::Done => SizeHint::with_exact(0),
            Kind::Once(Some(bytes)) => SizeHint::with_exact(bytes.len() as u64),
            Kind::Stream(body) => body.size_hint(),
        }
    }
}
