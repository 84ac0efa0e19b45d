//! Bridges the micro-wire transport model and an immutable framework model.
//!
//! A transport decodes requests into [`WireRequest`](micro_wire::protocol::WireRequest)s
//! and writes back [`WireResponse`](micro_wire::protocol::WireResponse)s. Application
//! code wants something else: an immutable [`Request`](model::Request) whose body is
//! pulled lazily, and a [`Response`](model::Response) it can build declaratively and
//! optionally attach a WebSocket upgrade to. This crate converts between the two.
//!
//! - [`inbound`]: wire request to framework request, plus the cleanup action that drains
//!   an abandoned request body exactly once
//! - [`outbound`]: framework response to wire response, including the body framing decision
//! - [`websocket`]: the upgrade handshake and the duplex frame adapter
//! - [`attributes`]: connection and TLS metadata attached to each request
//! - [`Bridge`]: all of the above for one exchange
//!
//! # Example
//!
//! ```no_run
//! use micro_bridge::model::Response;
//! use micro_bridge::websocket::WireOutcome;
//! use micro_bridge::{Bridge, handler_fn};
//! use micro_wire::channel::{Channel, ConnectionChannel};
//! use micro_wire::connection::ResponseWriter;
//! use micro_wire::protocol::{WireBody, WireHeaders, WireRequest};
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tracing::Level;
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let bridge = Bridge::builder().build();
//!     let handler = handler_fn(|_request| async { Ok::<_, Infallible>(Response::ok("hello world")) });
//!
//!     // normally handed over by the transport
//!     let channel: Arc<dyn Channel> = Arc::new(ConnectionChannel::new(
//!         "127.0.0.1:8080".parse::<std::net::SocketAddr>().unwrap(),
//!         "127.0.0.1:50000".parse::<std::net::SocketAddr>().unwrap(),
//!     ));
//!     let mut headers = WireHeaders::new();
//!     headers.add("Host", "127.0.0.1:8080");
//!     let wire = WireRequest::new("GET", "/", "HTTP/1.1", headers, WireBody::empty());
//!
//!     let exchange = bridge.serve(Arc::clone(&channel), wire, &handler).await.unwrap();
//!     let (outcome, _cleanup) = exchange.into_parts();
//!     if let WireOutcome::Response(response) = outcome {
//!         let mut writer = ResponseWriter::new(tokio::io::stdout());
//!         writer.write_response(response).await.unwrap();
//!     }
//! }
//! ```

mod config;
mod date;
mod error;
mod exchange;
mod handler;

pub mod attributes;
pub mod inbound;
pub mod model;
pub mod outbound;
pub mod websocket;

pub use config::{BridgeConfig, BridgeConfigBuilder};
pub use date::DateService;
pub use error::{BodyError, Component, ConvertError, HandshakeError};
pub use exchange::{Bridge, BridgeBuilder, Exchange};
pub use handler::{Handler, HandlerFn, handler_fn};
