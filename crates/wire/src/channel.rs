//! Connected channel abstraction.
//!
//! The core never touches sockets. It sees a connection through [`Channel`]: whether
//! it is still open, its two endpoints, the TLS session negotiated on it if any, and a
//! way to close it. [`ConnectionChannel`] is the implementation transports hand out;
//! the transport watches [`ConnectionChannel::closed`] and tears the socket down once
//! someone asks for the channel to be closed.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One endpoint of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAddr {
    Inet(SocketAddr),
    /// Unix domain socket, unnamed sockets have no path.
    Unix(Option<PathBuf>),
}

impl ChannelAddr {
    pub fn as_inet(&self) -> Option<SocketAddr> {
        match self {
            ChannelAddr::Inet(addr) => Some(*addr),
            ChannelAddr::Unix(_) => None,
        }
    }
}

impl From<SocketAddr> for ChannelAddr {
    fn from(addr: SocketAddr) -> Self {
        ChannelAddr::Inet(addr)
    }
}

impl fmt::Display for ChannelAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelAddr::Inet(addr) => addr.fmt(f),
            ChannelAddr::Unix(Some(path)) => write!(f, "unix:{}", path.display()),
            ChannelAddr::Unix(None) => f.write_str("unix:(unnamed)"),
        }
    }
}

/// What the TLS layer reports about the session negotiated on a channel.
///
/// Every field is optional: a session that is still resuming may not know its peer
/// chain yet, and anonymous suites have none at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSession {
    pub id: Option<Bytes>,
    pub cipher_suite: Option<String>,
    /// DER encoded certificates, leaf first.
    pub peer_certificates: Option<Vec<Bytes>>,
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn is_open(&self) -> bool;

    fn local_addr(&self) -> ChannelAddr;

    fn remote_addr(&self) -> ChannelAddr;

    fn tls_session(&self) -> Option<TlsSession>;

    /// Closes the channel and resolves once it is closed. Closing a closed channel is a no-op.
    async fn close(&self);

    /// Resolves once the channel has been closed, by anyone.
    async fn closed(&self);
}

/// A [`Channel`] whose open state is a cancellation token shared with the transport.
#[derive(Debug, Clone)]
pub struct ConnectionChannel {
    local: ChannelAddr,
    remote: ChannelAddr,
    tls: Option<TlsSession>,
    closed: CancellationToken,
}

impl ConnectionChannel {
    pub fn new(local: impl Into<ChannelAddr>, remote: impl Into<ChannelAddr>) -> Self {
        Self { local: local.into(), remote: remote.into(), tls: None, closed: CancellationToken::new() }
    }

    pub fn with_tls(mut self, tls: TlsSession) -> Self {
        self.tls = Some(tls);
        self
    }

    /// The token the transport watches; cancelling it marks the channel closed.
    pub fn close_token(&self) -> CancellationToken {
        self.closed.clone()
    }
}

#[async_trait]
impl Channel for ConnectionChannel {
    fn is_open(&self) -> bool {
        !self.closed.is_cancelled()
    }

    fn local_addr(&self) -> ChannelAddr {
        self.local.clone()
    }

    fn remote_addr(&self) -> ChannelAddr {
        self.remote.clone()
    }

    fn tls_session(&self) -> Option<TlsSession> {
        self.tls.clone()
    }

    async fn close(&self) {
        if !self.closed.is_cancelled() {
            debug!(remote = %self.remote, "closing channel");
            self.closed.cancel();
        }
    }

    async fn closed(&self) {
        self.closed.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    fn channel() -> ConnectionChannel {
        ConnectionChannel::new("127.0.0.1:8080".parse::<SocketAddr>().unwrap(), "10.0.0.7:50312".parse::<SocketAddr>().unwrap())
    }

    #[tokio::test]
    async fn close_is_observed_by_token_and_closed_future() {
        let channel = channel();
        let token = channel.close_token();

        assert!(channel.is_open());
        assert!(channel.closed().now_or_never().is_none());

        channel.close().await;

        assert!(!channel.is_open());
        assert!(token.is_cancelled());
        assert!(channel.closed().now_or_never().is_some());

        // closing again is harmless
        channel.close().await;
        assert!(!channel.is_open());
    }

    #[test]
    fn display_addresses() {
        let channel = channel();
        assert_eq!(channel.remote_addr().to_string(), "10.0.0.7:50312");
        assert_eq!(ChannelAddr::Unix(Some(PathBuf::from("/tmp/app.sock"))).to_string(), "unix:/tmp/app.sock");
        assert_eq!(ChannelAddr::Unix(None).as_inet(), None);
    }
}
