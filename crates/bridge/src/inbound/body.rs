use crate::error::BodyError;
use bytes::Bytes;
use futures::StreamExt;
use futures::task::AtomicWaker;
use http_body::{Body, Frame};
use micro_wire::protocol::{PayloadItem, PayloadSource};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

/// Payload source shared by a request body and its cleanup action.
///
/// Whoever holds the lock owns the source for that moment. The cleanup action takes
/// the source out for good, so a reader polling afterwards finds it gone.
///
/// `finished` is set once, either by the reader reaching the end of the body or by the
/// cleanup action claiming it.
#[derive(Debug)]
pub(crate) struct SharedSource {
    source: Mutex<Option<PayloadSource>>,
    reader: AtomicWaker,
    finished: AtomicBool,
}

impl SharedSource {
    pub(crate) fn new(source: PayloadSource) -> Self {
        Self { source: Mutex::new(Some(source)), reader: AtomicWaker::new(), finished: AtomicBool::new(false) }
    }

    /// Marks the body as done. Only the first caller gets `true`.
    pub(crate) fn finish(&self) -> bool {
        self.finished.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, Option<PayloadSource>> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes the source and wakes a reader parked on it.
    pub(crate) fn take(&self) -> Option<PayloadSource> {
        let source = self.lock().take();
        self.reader.wake();
        source
    }
}

/// Request body backed by the transport's payload source.
///
/// Chunks are pulled on demand, so the transport only decodes as fast as the
/// application reads.
#[derive(Debug)]
pub(crate) struct InboundBody {
    shared: Arc<SharedSource>,
    eof: bool,
}

impl InboundBody {
    pub(crate) fn new(shared: Arc<SharedSource>) -> Self {
        Self { shared, eof: false }
    }
}

impl Body for InboundBody {
    type Data = Bytes;
    type Error = BodyError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.eof {
            return Poll::Ready(None);
        }

        this.shared.reader.register(cx.waker());
        let mut guard = this.shared.lock();
        let Some(source) = guard.as_mut() else {
            this.eof = true;
            return Poll::Ready(Some(Err(BodyError::Drained)));
        };

        match source.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(PayloadItem::Chunk(bytes)))) => Poll::Ready(Some(Ok(Frame::data(bytes)))),
            Poll::Ready(Some(Ok(PayloadItem::Eof)) | None) => {
                this.eof = true;
                this.shared.finish();
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(e))) => {
                this.eof = true;
                this.shared.finish();
                Poll::Ready(Some(Err(BodyError::Transport(e))))
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use http_body_util::BodyExt;
    use micro_wire::protocol::{ParseError, payload_channel};

    #[tokio::test]
    async fn pulls_chunks_until_eof() {
        let (mut sender, source) = payload_channel(4);
        let mut body = InboundBody::new(Arc::new(SharedSource::new(source)));

        sender.send_chunk(Bytes::from_static(b"abc")).await.unwrap();
        sender.finish().await.unwrap();

        assert_eq!(body.frame().await.unwrap().unwrap().into_data().unwrap(), Bytes::from_static(b"abc"));
        assert!(body.frame().await.is_none());
        assert!(body.is_end_stream());
        assert!(body.shared.is_finished());
    }

    #[tokio::test]
    async fn transport_failure_ends_the_body() {
        let (mut sender, source) = payload_channel(4);
        let mut body = InboundBody::new(Arc::new(SharedSource::new(source)));

        sender.fail(ParseError::invalid_body("bad chunk size")).await.unwrap();

        assert!(matches!(body.frame().await, Some(Err(BodyError::Transport(_)))));
        assert!(body.frame().await.is_none());
        assert!(!body.shared.finish());
    }

    #[tokio::test]
    async fn parked_reader_is_woken_when_source_is_taken() {
        let (_sender, source) = payload_channel(4);
        let shared = Arc::new(SharedSource::new(source));
        let mut body = InboundBody::new(Arc::clone(&shared));

        let mut frame = body.frame();
        assert!((&mut frame).now_or_never().is_none());

        assert!(shared.take().is_some());
        assert!(matches!(frame.await, Some(Err(BodyError::Drained))));
        assert!(body.frame().await.is_none());
    }
}
