//! Transport layer for MCP communication.
//!
//! The connection manager owns a [`Transport`] and pulls its events from
//! inside `tick()`, so everything above this layer runs on one thread.

pub mod endpoint;
pub mod memory;
#[cfg(feature = "websocket")]
pub mod websocket;

pub use endpoint::{Endpoint, Scheme};
pub use memory::MemoryTransport;
#[cfg(feature = "websocket")]
pub use websocket::WebSocketTransport;

use crate::types::McpResult;

/// Something that happened on the link since the last poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The link is established.
    Open,
    /// The link is gone, or a dial failed.
    Close,
    Text(String),
    Binary(Vec<u8>),
    /// A non-fatal transport error; a `Close` follows if the link dropped.
    Error(String),
}

/// A full-duplex text transport.
pub trait Transport: Send {
    /// Start dialing `endpoint`. Completion is reported later as `Open` or `Close`.
    fn open(&mut self, endpoint: &Endpoint) -> McpResult<()>;

    /// Queue a text frame on the current link.
    fn send_text(&mut self, text: &str) -> McpResult<()>;

    /// Drain events queued since the last call.
    fn poll(&mut self) -> Vec<TransportEvent>;

    /// Tear down the current link or dial, if any.
    fn close(&mut self);

    /// True when there is neither a live link nor a dial in progress.
    fn is_idle(&self) -> bool;
}
