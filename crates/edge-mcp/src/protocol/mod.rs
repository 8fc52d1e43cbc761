//! MCP protocol handling — JSON-RPC codec and method dispatch.

pub mod codec;
pub mod handler;
pub mod negotiation;

pub use handler::{Dispatch, ProtocolHandler};
