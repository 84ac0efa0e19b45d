//! One request/response exchange, end to end.
//!
//! [`Bridge::serve`] is what a transport calls per decoded request: it converts the
//! wire request, hands it to the application, and converts whatever comes back into
//! a [`WireOutcome`]. The transport then writes the outcome and keeps the returned
//! [`CleanupAction`] until the connection is done.

use crate::config::BridgeConfig;
use crate::date::DateService;
use crate::error::ConvertError;
use crate::handler::Handler;
use crate::inbound::{CleanupAction, convert_request};
use crate::model::Response;
use crate::websocket::{WireOutcome, convert_exchange};
use http::StatusCode;
use micro_wire::channel::Channel;
use micro_wire::protocol::WireRequest;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

#[derive(Debug, Clone, Default)]
pub struct Bridge {
    config: BridgeConfig,
}

#[derive(Debug, Default)]
pub struct BridgeBuilder {
    config: Option<BridgeConfig>,
}

impl BridgeBuilder {
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Bridge {
        Bridge { config: self.config.unwrap_or_default() }
    }
}

impl Bridge {
    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::default()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Runs one exchange.
    ///
    /// A handler failure is answered with `500 Internal Server Error`; only a request
    /// that cannot be converted at all is an error, and the transport should drop the
    /// connection when it gets one.
    pub async fn serve<H>(&self, channel: Arc<dyn Channel>, wire: WireRequest, handler: &H) -> Result<Exchange, ConvertError>
    where
        H: Handler + ?Sized,
    {
        let (request, cleanup) = convert_request(channel, wire)?;
        let head = request.head().clone();
        debug!(method = %head.method(), uri = %head.uri(), "serving request");

        let response = match handler.call(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(cause = %e, "handler failed");
                Response::with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        let outcome = DateService::get_global_instance().with_http_date(|date| convert_exchange(&head, response, date, &self.config))?;
        Ok(Exchange { outcome, cleanup })
    }
}

/// The result of [`Bridge::serve`].
#[derive(Debug)]
pub struct Exchange {
    outcome: WireOutcome,
    cleanup: CleanupAction,
}

impl Exchange {
    pub fn outcome(&self) -> &WireOutcome {
        &self.outcome
    }

    pub fn cleanup(&self) -> &CleanupAction {
        &self.cleanup
    }

    /// Releases whatever the application left of the request body.
    ///
    /// Meant for the transport to call once the response has been written. A body that
    /// was read to the end needs nothing and the channel stays open for the next
    /// request; an abandoned one closes the channel and is drained. Returns whether this
    /// call did the draining.
    pub async fn release(&self) -> bool {
        self.cleanup.run().await
    }

    /// Arranges for the request body to be drained once `channel` closes.
    ///
    /// Returns `None` when there is nothing to drain. The handle resolves to whether
    /// this run did the draining, which it does not if the cleanup ran elsewhere first.
    pub fn drain_on_close(&self, channel: Arc<dyn Channel>) -> Option<JoinHandle<bool>> {
        if self.cleanup.is_noop() {
            return None;
        }

        let cleanup = self.cleanup.clone();
        Some(tokio::spawn(async move {
            channel.closed().await;
            cleanup.run().await
        }))
    }

    pub fn into_parts(self) -> (WireOutcome, CleanupAction) {
        (self.outcome, self.cleanup)
    }
}
