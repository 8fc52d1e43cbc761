//! The MCP client facade: connection, protocol handler, and tool registry together.
//!
//! Everything runs inside [`McpClient::tick`], which the host must call often.
//! Tool callbacks execute synchronously on that call: a slow callback delays
//! heartbeat and reconnect processing, and a callback that never returns
//! starves the connection. There is no per-call timeout.

use std::sync::Arc;

use edge_tools::{parse_schema, Tool, ToolRegistry, ToolResult};

use crate::config::ClientConfig;
use crate::connection::{Clock, ConnectionManager, SystemClock};
use crate::protocol::ProtocolHandler;
use crate::transport::Transport;
use crate::types::McpResult;

#[cfg(feature = "websocket")]
use crate::transport::WebSocketTransport;

pub struct McpClient<T: Transport> {
    connection: ConnectionManager<T>,
    handler: ProtocolHandler,
    tools: ToolRegistry,
}

#[cfg(feature = "websocket")]
impl McpClient<WebSocketTransport> {
    /// Client over a real WebSocket, spawning link tasks on `runtime`.
    pub fn websocket(config: ClientConfig, runtime: tokio::runtime::Handle) -> Self {
        let transport = WebSocketTransport::new(runtime, config.heartbeat.clone());
        Self::new(transport, config)
    }
}

impl<T: Transport> McpClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self::with_clock(transport, config, Arc::new(SystemClock))
    }

    pub fn with_clock(transport: T, config: ClientConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            connection: ConnectionManager::with_clock(transport, config.connection, clock),
            handler: ProtocolHandler::new(config.server),
            tools: ToolRegistry::new(),
        }
    }

    /// Start connecting to `endpoint`; `on_status` hears every connect/disconnect.
    pub fn begin<F>(&mut self, endpoint: &str, on_status: F) -> McpResult<()>
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.connection.set_status_callback(Box::new(on_status));
        self.connection.connect(endpoint)
    }

    /// Process I/O, answer inbound requests, and run reconnect/heartbeat checks.
    pub fn tick(&mut self) {
        let handler = &self.handler;
        let tools = &self.tools;
        self.connection.tick(|link, text| {
            let dispatch = handler.handle_text(text, tools);
            if dispatch.heartbeat {
                link.record_heartbeat();
            }
            for reply in &dispatch.replies {
                if let Err(e) = link.send(reply) {
                    tracing::warn!("Reply not delivered: {e}");
                }
            }
        });
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn disconnect(&mut self) {
        self.connection.disconnect();
    }

    /// Disconnect and stop reconnecting.
    pub fn shutdown(&mut self) {
        self.connection.shutdown();
    }

    /// Send a raw text frame to the server.
    pub fn send_message(&mut self, message: &str) -> McpResult<()> {
        self.connection.send(message)
    }

    /// Register a tool with a JSON-text input schema. Re-registering a name
    /// replaces its description, schema, and callback in place.
    pub fn register_tool<F>(
        &mut self,
        name: &str,
        description: &str,
        input_schema: &str,
        callback: F,
    ) -> McpResult<()>
    where
        F: Fn(&str) -> ToolResult + Send + Sync + 'static,
    {
        let schema = parse_schema(input_schema)?;
        self.tools
            .register(Tool::new(name, description, schema).with_callback(callback))?;
        Ok(())
    }

    /// Register a tool with one required parameter.
    pub fn register_simple_tool<F>(
        &mut self,
        name: &str,
        description: &str,
        param_name: &str,
        param_description: &str,
        param_type: &str,
        callback: F,
    ) -> McpResult<()>
    where
        F: Fn(&str) -> ToolResult + Send + Sync + 'static,
    {
        self.tools.register_simple(
            name,
            description,
            param_name,
            param_description,
            param_type,
            callback,
        )?;
        Ok(())
    }

    /// Replace only the callback of an already registered tool.
    pub fn set_tool_callback<F>(&mut self, name: &str, callback: F) -> bool
    where
        F: Fn(&str) -> ToolResult + Send + Sync + 'static,
    {
        self.tools.set_callback(name, callback)
    }

    pub fn unregister_tool(&mut self, name: &str) -> bool {
        self.tools.unregister(name)
    }

    pub fn tool_count(&self) -> usize {
        self.tools.count()
    }

    pub fn clear_tools(&mut self) {
        self.tools.clear();
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    pub fn connection(&self) -> &ConnectionManager<T> {
        &self.connection
    }

    pub fn handler(&self) -> &ProtocolHandler {
        &self.handler
    }
}
