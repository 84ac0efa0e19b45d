//! Wire-level WebSocket model.
//!
//! After a successful upgrade the transport stops speaking HTTP on the connection
//! and exchanges raw [`WireFrame`]s instead. The core answers an upgrade request
//! with a [`WireUpgrade`]: the `101` response plus a [`FrameProcessor`] that the
//! transport starts once the response is on the wire.

mod frame;
mod upgrade;

pub use frame::OpCode;
pub use frame::WireFrame;
pub use upgrade::FrameProcessor;
pub use upgrade::FrameSender;
pub use upgrade::FrameSource;
pub use upgrade::WEBSOCKET_VERSION;
pub use upgrade::WireUpgrade;
pub use upgrade::derive_accept_key;
pub use upgrade::frame_channel;
