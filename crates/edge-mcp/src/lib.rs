//! edge-mcp — MCP client over WebSocket that exposes registered tools to a remote MCP server.

pub mod client;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use client::McpClient;
pub use config::{resolve_endpoint, ClientConfig};
pub use connection::{ConnectionManager, ConnectionState};
pub use protocol::ProtocolHandler;
pub use transport::{MemoryTransport, Transport, TransportEvent};
#[cfg(feature = "websocket")]
pub use transport::WebSocketTransport;

pub use edge_tools::{ContentItem, Tool, ToolArgs, ToolRegistry, ToolResult};
