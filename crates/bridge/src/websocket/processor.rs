use crate::model::WsFrame;
use crate::websocket::translate::{to_framework, to_wire};
use async_trait::async_trait;
use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use micro_wire::websocket::{FrameProcessor, FrameSender, FrameSource, WireFrame};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Close code for a frame larger than the connection accepts, RFC 6455 section 7.4.1.
const MESSAGE_TOO_BIG: u16 = 1009;

/// Full-duplex adapter between the transport's raw frames and the application's session.
///
/// Two loops run side by side, one per direction. The outbound loop ends after it has
/// forwarded a Close. The inbound loop stops forwarding after a Close but keeps watching
/// the peer until the closing handshake completes or the connection goes away. The end
/// of the peer's frames, a broken frame, a dead wire sink or an oversized frame cancels
/// both loops.
#[derive(Debug)]
pub struct WebSocketProcessor {
    to_app: mpsc::Sender<WsFrame>,
    from_app: mpsc::Receiver<WsFrame>,
    max_frame_payload_len: usize,
}

impl WebSocketProcessor {
    pub(crate) fn new(to_app: mpsc::Sender<WsFrame>, from_app: mpsc::Receiver<WsFrame>, max_frame_payload_len: usize) -> Self {
        Self { to_app, from_app, max_frame_payload_len }
    }
}

#[async_trait]
impl FrameProcessor for WebSocketProcessor {
    async fn on_handshake_complete(self: Box<Self>, source: FrameSource, sink: FrameSender) {
        let WebSocketProcessor { to_app, from_app, max_frame_payload_len } = *self;
        let closing = Closing::default();

        let inbound = inbound_loop(source, to_app, sink.clone(), max_frame_payload_len, closing.clone());
        let outbound = outbound_loop(from_app, sink, closing);
        tokio::join!(inbound, outbound);

        debug!("websocket session finished");
    }
}

/// Shutdown state shared by the two loops.
///
/// `done` stops both loops. It fires on any failure, or once a Close has gone each way.
#[derive(Debug, Clone, Default)]
struct Closing {
    done: CancellationToken,
    peer_closed: CancellationToken,
    app_closed: CancellationToken,
}

impl Closing {
    fn peer_sent_close(&self) {
        self.peer_closed.cancel();
        if self.app_closed.is_cancelled() {
            self.done.cancel();
        }
    }

    fn app_sent_close(&self) {
        self.app_closed.cancel();
        if self.peer_closed.is_cancelled() {
            self.done.cancel();
        }
    }
}

/// Peer to application.
async fn inbound_loop(mut source: FrameSource, mut to_app: mpsc::Sender<WsFrame>, mut sink: FrameSender, max_len: usize, closing: Closing) {
    let cancel = &closing.done;
    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => return,
            next = source.next() => next,
        };

        let frame = match next {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => {
                warn!(cause = %e, "websocket frame failed to decode");
                cancel.cancel();
                return;
            }
            None => {
                debug!("peer frame source ended");
                cancel.cancel();
                return;
            }
        };

        if frame.payload().len() > max_len {
            warn!(size = frame.payload().len(), max = max_len, "websocket frame too large");
            if let Err(e) = sink.send(WireFrame::close_with(MESSAGE_TOO_BIG, "frame too large")).await {
                debug!(cause = %e, "could not send close frame");
            }
            cancel.cancel();
            return;
        }

        let frame = to_framework(frame);
        let is_close = frame.is_close();

        tokio::select! {
            () = cancel.cancelled() => return,
            sent = to_app.send(frame) => if sent.is_err() {
                // keep reading so the transport is never stuck on a full pipe
                trace!("application no longer receives, frame dropped");
            },
        }

        if is_close {
            break;
        }
    }

    drop(to_app);
    closing.peer_sent_close();

    // nothing more is forwarded, but a reset connection must still stop the outbound side
    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => return,
            next = source.next() => next,
        };
        match next {
            Some(Ok(frame)) => trace!(opcode = ?frame.opcode(), "frame after close dropped"),
            Some(Err(e)) => {
                debug!(cause = %e, "peer frame source failed after close");
                cancel.cancel();
                return;
            }
            None => {
                debug!("peer frame source ended after close");
                cancel.cancel();
                return;
            }
        }
    }
}

/// Application to peer.
async fn outbound_loop(mut from_app: mpsc::Receiver<WsFrame>, mut sink: FrameSender, closing: Closing) {
    let cancel = &closing.done;
    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => break,
            next = from_app.next() => next,
        };

        let Some(frame) = next else {
            debug!("application closed its frame sender");
            break;
        };

        let is_close = frame.is_close();
        let sent = tokio::select! {
            () = cancel.cancelled() => break,
            sent = sink.send(to_wire(frame)) => sent,
        };

        if let Err(e) = sent {
            warn!(cause = %e, "websocket sink failed");
            cancel.cancel();
            break;
        }

        if is_close {
            closing.app_sent_close();
            break;
        }
    }
}
