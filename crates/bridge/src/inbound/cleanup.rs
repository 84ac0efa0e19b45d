use crate::inbound::body::SharedSource;
use futures::StreamExt;
use micro_wire::channel::Channel;
use micro_wire::protocol::PayloadItem;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// One-shot release of the transport resources behind a request body.
///
/// Run it when the channel closes or once the response has been written. A body the
/// application read to the end has already released everything, so running the
/// action afterwards does nothing. Clones share the same state: however many times
/// and from however many tasks it is run, the work happens once.
#[derive(Clone)]
pub struct CleanupAction {
    inner: Option<Arc<Drain>>,
}

struct Drain {
    channel: Arc<dyn Channel>,
    shared: Arc<SharedSource>,
}

impl CleanupAction {
    /// Cleanup for a body that holds no transport resources.
    pub fn noop() -> Self {
        Self { inner: None }
    }

    pub(crate) fn drain(channel: Arc<dyn Channel>, shared: Arc<SharedSource>) -> Self {
        Self { inner: Some(Arc::new(Drain { channel, shared })) }
    }

    pub fn is_noop(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns true only for the invocation that did the work.
    ///
    /// An open channel is closed first; then whatever is left of the body is read and
    /// discarded until end-of-stream, a transport error or the transport going away.
    /// A reader still parked on the body observes [`BodyError::Drained`](crate::BodyError::Drained).
    pub async fn run(&self) -> bool {
        let Some(drain) = &self.inner else {
            return false;
        };

        if !drain.shared.finish() {
            return false;
        }

        if drain.channel.is_open() {
            drain.channel.close().await;
        }

        let Some(mut source) = drain.shared.take() else {
            return true;
        };

        let mut size: usize = 0;
        while let Some(item) = source.next().await {
            match item {
                Ok(PayloadItem::Chunk(bytes)) => size += bytes.len(),
                Ok(PayloadItem::Eof) => break,
                Err(e) => {
                    debug!(cause = %e, "request body failed while draining");
                    break;
                }
            }
        }

        if size > 0 {
            info!(size = size, "skip request body");
        }
        true
    }
}

impl fmt::Debug for CleanupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            None => f.write_str("CleanupAction::Noop"),
            Some(drain) => f.debug_struct("CleanupAction").field("finished", &drain.shared.is_finished()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use micro_wire::channel::{ChannelAddr, TlsSession};
    use micro_wire::protocol::payload_channel;
    use mockall::mock;

    mock! {
        Chan {}

        #[async_trait]
        impl Channel for Chan {
            fn is_open(&self) -> bool;
            fn local_addr(&self) -> ChannelAddr;
            fn remote_addr(&self) -> ChannelAddr;
            fn tls_session(&self) -> Option<TlsSession>;
            async fn close(&self);
            async fn closed(&self);
        }
    }

    #[tokio::test]
    async fn noop_does_nothing() {
        let cleanup = CleanupAction::noop();
        assert!(cleanup.is_noop());
        assert!(!cleanup.run().await);
    }

    #[tokio::test]
    async fn open_channel_is_closed_then_drained_once() {
        let mut channel = MockChan::new();
        channel.expect_is_open().times(1).return_const(true);
        channel.expect_close().times(1).return_const(());

        let (mut sender, source) = payload_channel(4);
        sender.send_chunk(Bytes::from_static(b"unread")).await.unwrap();
        sender.finish().await.unwrap();

        let cleanup = CleanupAction::drain(Arc::new(channel), Arc::new(SharedSource::new(source)));

        assert!(cleanup.run().await);
        assert!(!cleanup.run().await);
        assert!(!cleanup.clone().run().await);
    }

    #[tokio::test]
    async fn closed_channel_is_only_drained() {
        let mut channel = MockChan::new();
        channel.expect_is_open().times(1).return_const(false);
        channel.expect_close().never();

        let (sender, source) = payload_channel(4);
        drop(sender);

        let cleanup = CleanupAction::drain(Arc::new(channel), Arc::new(SharedSource::new(source)));
        assert!(cleanup.run().await);
    }

    #[tokio::test]
    async fn fully_read_body_leaves_the_channel_open() {
        use crate::inbound::body::InboundBody;
        use http_body_util::BodyExt;

        let mut channel = MockChan::new();
        channel.expect_is_open().never();
        channel.expect_close().never();

        let (mut sender, source) = payload_channel(4);
        sender.send_chunk(Bytes::from_static(b"abc")).await.unwrap();
        sender.finish().await.unwrap();

        let shared = Arc::new(SharedSource::new(source));
        let body = InboundBody::new(Arc::clone(&shared));
        let cleanup = CleanupAction::drain(Arc::new(channel), shared);

        assert_eq!(body.collect().await.unwrap().to_bytes(), Bytes::from_static(b"abc"));
        assert!(!cleanup.run().await);
    }

    #[tokio::test]
    async fn concurrent_runs_release_once() {
        let mut channel = MockChan::new();
        channel.expect_is_open().times(1).return_const(true);
        channel.expect_close().times(1).return_const(());

        let (mut sender, source) = payload_channel(1);
        let cleanup = CleanupAction::drain(Arc::new(channel), Arc::new(SharedSource::new(source)));

        let runs: Vec<_> = (0..8)
            .map(|_| {
                let cleanup = cleanup.clone();
                tokio::spawn(async move { cleanup.run().await })
            })
            .collect();

        sender.send_chunk(Bytes::from_static(b"late")).await.unwrap();
        sender.finish().await.unwrap();

        let mut performed = 0;
        for run in runs {
            if run.await.unwrap() {
                performed += 1;
            }
        }
        assert_eq!(performed, 1);
    }
}
