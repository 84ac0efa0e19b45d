use crate::protocol::{ParseError, PayloadItem};
use bytes::Bytes;
use futures::{SinkExt, Stream, StreamExt, channel::mpsc};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::error;

/// Creates the push-based source of a streamed wire body.
///
/// The transport keeps the [`PayloadSender`] and pushes decoded chunks into it; the
/// [`PayloadSource`] travels inside the [`WireRequest`](crate::protocol::WireRequest).
/// The channel is bounded by `capacity`, so a slow consumer parks the transport's
/// decoder instead of letting chunks pile up in memory.
pub fn payload_channel(capacity: usize) -> (PayloadSender, PayloadSource) {
    let (data_sender, data_receiver) = mpsc::channel(capacity);
    (PayloadSender { data_sender, eof: false }, PayloadSource { data_receiver, eof: false })
}

/// Producer half of a streamed wire body, owned by the transport.
#[derive(Debug)]
pub struct PayloadSender {
    data_sender: mpsc::Sender<Result<PayloadItem, ParseError>>,
    eof: bool,
}

impl PayloadSender {
    /// Pushes one chunk, waiting for capacity if the consumer is behind.
    pub async fn send_chunk(&mut self, bytes: Bytes) -> Result<(), ParseError> {
        if self.eof {
            return Err(ParseError::invalid_body("payload already finished"));
        }
        self.send(Ok(PayloadItem::Chunk(bytes))).await
    }

    /// Signals end-of-stream. Further sends are rejected.
    pub async fn finish(&mut self) -> Result<(), ParseError> {
        if self.eof {
            return Ok(());
        }
        self.eof = true;
        self.send(Ok(PayloadItem::Eof)).await
    }

    /// Reports a decode failure of the body to the consumer.
    pub async fn fail(&mut self, e: ParseError) -> Result<(), ParseError> {
        self.eof = true;
        self.send(Err(e)).await
    }

    /// Returns true once the consuming side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.data_sender.is_closed()
    }

    async fn send(&mut self, item: Result<PayloadItem, ParseError>) -> Result<(), ParseError> {
        self.data_sender.send(item).await.map_err(|e| {
            error!("failed to send payload body through channel, {}", e);
            ParseError::invalid_body("payload consumer has gone")
        })
    }
}

/// Consumer half of a streamed wire body.
///
/// Yields chunks until [`PayloadItem::Eof`]; once end-of-stream or an error has been
/// observed the source is exhausted and yields `None`. If the sender is dropped
/// without finishing, the source yields an error once.
#[derive(Debug)]
pub struct PayloadSource {
    data_receiver: mpsc::Receiver<Result<PayloadItem, ParseError>>,
    eof: bool,
}

impl PayloadSource {
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.eof
    }
}

impl Stream for PayloadSource {
    type Item = Result<PayloadItem, ParseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.eof {
            return Poll::Ready(None);
        }

        match this.data_receiver.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(item))) => {
                this.eof = item.is_eof();
                Poll::Ready(Some(Ok(item)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.eof = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.eof = true;
                Poll::Ready(Some(Err(ParseError::invalid_body("payload sender dropped before eof"))))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
