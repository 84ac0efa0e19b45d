//! Framework side of a WebSocket exchange.
//!
//! An application that wants to upgrade a request creates a pair with
//! [`WebSocketUpgrade::channel`]: the [`WebSocketUpgrade`] goes into the response as its
//! upgrade context, the [`WebSocketSession`] stays with the application and is used to
//! send and receive [`WsFrame`]s once the handshake has been accepted.

use crate::model::Response;
use bytes::Bytes;
use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tracing::trace;

/// A WebSocket frame as the application sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsFrame {
    Text { payload: Bytes, is_final: bool },
    Binary { payload: Bytes, is_final: bool },
    Continuation { payload: Bytes, is_final: bool },
    Ping(Bytes),
    Pong(Bytes),
    Close(Bytes),
}

impl WsFrame {
    pub fn text(text: impl Into<String>) -> Self {
        WsFrame::Text { payload: Bytes::from(text.into()), is_final: true }
    }

    pub fn binary(payload: impl Into<Bytes>) -> Self {
        WsFrame::Binary { payload: payload.into(), is_final: true }
    }

    pub fn payload(&self) -> &Bytes {
        match self {
            WsFrame::Text { payload, .. } | WsFrame::Binary { payload, .. } | WsFrame::Continuation { payload, .. } => payload,
            WsFrame::Ping(payload) | WsFrame::Pong(payload) | WsFrame::Close(payload) => payload,
        }
    }

    /// Control frames are never fragmented.
    pub fn is_final(&self) -> bool {
        match self {
            WsFrame::Text { is_final, .. } | WsFrame::Binary { is_final, .. } | WsFrame::Continuation { is_final, .. } => *is_final,
            WsFrame::Ping(_) | WsFrame::Pong(_) | WsFrame::Close(_) => true,
        }
    }

    pub fn is_close(&self) -> bool {
        matches!(self, WsFrame::Close(_))
    }
}

/// Returned when the other side of a session is gone.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("websocket session closed")]
pub struct SessionClosed;

/// Upgrade context carried by a [`Response`].
///
/// Holds the bridge's ends of the two frame pipes and the response to send instead
/// when the request turns out not to be upgradable.
#[derive(Debug)]
pub struct WebSocketUpgrade {
    to_app: mpsc::Sender<WsFrame>,
    from_app: mpsc::Receiver<WsFrame>,
    failure: Option<Box<Response>>,
}

impl WebSocketUpgrade {
    /// Creates an upgrade context and the application's session, each pipe holding up
    /// to `capacity` frames in flight.
    pub fn channel(capacity: usize) -> (WebSocketUpgrade, WebSocketSession) {
        let (to_app, app_receiver) = mpsc::channel(capacity);
        let (app_sender, from_app) = mpsc::channel(capacity);
        let upgrade = WebSocketUpgrade { to_app, from_app, failure: None };
        let session = WebSocketSession { sender: WsSender { inner: app_sender }, receiver: WsReceiver { inner: app_receiver } };
        (upgrade, session)
    }

    /// Sets the response sent when the upgrade does not happen.
    pub fn with_failure_response(mut self, response: Response) -> Self {
        self.failure = Some(Box::new(response));
        self
    }

    pub fn failure_response(&self) -> Option<&Response> {
        self.failure.as_deref()
    }

    pub(crate) fn take_failure_response(&mut self) -> Option<Response> {
        self.failure.take().map(|response| *response)
    }

    pub(crate) fn into_pipes(self) -> (mpsc::Sender<WsFrame>, mpsc::Receiver<WsFrame>) {
        (self.to_app, self.from_app)
    }
}

/// The application's end of an upgraded connection.
#[derive(Debug)]
pub struct WebSocketSession {
    sender: WsSender,
    receiver: WsReceiver,
}

impl WebSocketSession {
    pub async fn send(&mut self, frame: WsFrame) -> Result<(), SessionClosed> {
        self.sender.send(frame).await
    }

    /// Next frame from the peer, `None` once the connection is done.
    pub async fn recv(&mut self) -> Option<WsFrame> {
        self.receiver.next().await
    }

    pub fn split(self) -> (WsSender, WsReceiver) {
        (self.sender, self.receiver)
    }
}

#[derive(Debug, Clone)]
pub struct WsSender {
    inner: mpsc::Sender<WsFrame>,
}

impl WsSender {
    pub async fn send(&mut self, frame: WsFrame) -> Result<(), SessionClosed> {
        self.inner.send(frame).await.map_err(|e| {
            trace!(cause = %e, "websocket session receiver has gone");
            SessionClosed
        })
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

#[derive(Debug)]
pub struct WsReceiver {
    inner: mpsc::Receiver<WsFrame>,
}

impl Stream for WsReceiver {
    type Item = WsFrame;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.poll_next_unpin(cx)
    }
}
