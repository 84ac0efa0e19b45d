use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::{SinkExt, Stream, StreamExt, channel::mpsc};
use tokio_tungstenite::tungstenite::handshake;
use tracing::error;

use crate::protocol::{ParseError, WireResponse};
use crate::websocket::WireFrame;

/// The only protocol version accepted by [`derive_accept_key`] based handshakes.
pub const WEBSOCKET_VERSION: &str = "13";

/// Computes the `Sec-WebSocket-Accept` value for a client's `Sec-WebSocket-Key`.
pub fn derive_accept_key(key: &str) -> String {
    handshake::derive_accept_key(key.trim().as_bytes())
}

/// Creates a bounded, push-based frame pipe.
///
/// The transport uses one pipe per direction: it pushes decoded frames into the
/// inbound [`FrameSender`] and writes out whatever the outbound [`FrameSource`] yields.
pub fn frame_channel(capacity: usize) -> (FrameSender, FrameSource) {
    let (sender, receiver) = mpsc::channel(capacity);
    (FrameSender { sender }, FrameSource { receiver })
}

#[derive(Debug, Clone)]
pub struct FrameSender {
    sender: mpsc::Sender<Result<WireFrame, ParseError>>,
}

impl FrameSender {
    pub async fn send(&mut self, frame: WireFrame) -> Result<(), ParseError> {
        self.push(Ok(frame)).await
    }

    /// Reports a frame decoding failure to the other side.
    pub async fn fail(&mut self, e: ParseError) -> Result<(), ParseError> {
        self.push(Err(e)).await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn push(&mut self, item: Result<WireFrame, ParseError>) -> Result<(), ParseError> {
        self.sender.send(item).await.map_err(|e| {
            error!("failed to send websocket frame through channel, {}", e);
            ParseError::invalid_frame("frame receiver has gone")
        })
    }
}

#[derive(Debug)]
pub struct FrameSource {
    receiver: mpsc::Receiver<Result<WireFrame, ParseError>>,
}

impl Stream for FrameSource {
    type Item = Result<WireFrame, ParseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_next_unpin(cx)
    }
}

/// Full-duplex frame processor attached to an accepted upgrade.
///
/// The transport writes the 101 response first, then calls
/// [`on_handshake_complete`](FrameProcessor::on_handshake_complete) with the frames
/// arriving from the peer and the sink for frames going out. The returned future
/// completes when both directions are done.
#[async_trait]
pub trait FrameProcessor: Send {
    async fn on_handshake_complete(self: Box<Self>, source: FrameSource, sink: FrameSender);
}

/// The wire-level result of an accepted WebSocket handshake.
pub struct WireUpgrade {
    response: WireResponse,
    max_frame_payload_len: usize,
    processor: Box<dyn FrameProcessor>,
}

impl WireUpgrade {
    pub fn new(response: WireResponse, max_frame_payload_len: usize, processor: Box<dyn FrameProcessor>) -> Self {
        Self { response, max_frame_payload_len, processor }
    }

    /// The `101 Switching Protocols` response to write before any frame.
    pub fn response(&self) -> &WireResponse {
        &self.response
    }

    /// Largest payload the transport's frame decoder should accept.
    pub fn max_frame_payload_len(&self) -> usize {
        self.max_frame_payload_len
    }

    pub fn into_parts(self) -> (WireResponse, Box<dyn FrameProcessor>) {
        (self.response, self.processor)
    }
}

impl fmt::Debug for WireUpgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireUpgrade")
            .field("response", &self.response)
            .field("max_frame_payload_len", &self.max_frame_payload_len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_key_from_rfc_sample() {
        // RFC 6455 section 1.3
        assert_eq!(derive_accept_key("dGhlIHNhbXBsZSBub25jZQ=="), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
    }

    #[tokio::test]
    async fn frames_and_failures_flow_in_order() {
        let (mut sender, mut source) = frame_channel(4);

        sender.send(WireFrame::text(true, "hi")).await.unwrap();
        sender.fail(ParseError::invalid_frame("bad mask")).await.unwrap();
        drop(sender);

        assert_eq!(source.next().await.unwrap().unwrap(), WireFrame::text(true, "hi"));
        assert!(source.next().await.unwrap().is_err());
        assert!(source.next().await.is_none());
    }
}
