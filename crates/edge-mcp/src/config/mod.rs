//! Configuration loading and resolution.

use std::time::Duration;

use crate::types::{MCP_VERSION, SERVER_NAME, SERVER_VERSION};

/// Environment variable consulted when no endpoint is given explicitly.
pub const ENDPOINT_ENV: &str = "MCP_ENDPOINT";

/// Identity reported in the `initialize` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
    pub protocol_version: String,
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: SERVER_NAME.to_string(),
            version: SERVER_VERSION.to_string(),
            protocol_version: MCP_VERSION.to_string(),
        }
    }
}

/// Reconnection and liveness settings for the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Wait before the second reconnection attempt; doubles per attempt.
    pub initial_backoff: Duration,
    /// Upper bound for the reconnection wait.
    pub max_backoff: Duration,
    /// Connection is treated as dead when no `ping` arrived for this long.
    pub heartbeat_window: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            heartbeat_window: Duration::from_secs(120),
        }
    }
}

/// Transport-level keep-alive settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Interval between WebSocket pings.
    pub ping_interval: Duration,
    /// Link is dropped when nothing was received for this long.
    pub disconnect_timeout: Duration,
    /// Limit for a single dial, including the WebSocket handshake.
    pub connect_timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(10),
            disconnect_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub server: ServerIdentity,
    pub connection: ConnectionConfig,
    pub heartbeat: HeartbeatConfig,
}

/// Resolve the endpoint URL: explicit value first, then `MCP_ENDPOINT`.
pub fn resolve_endpoint(explicit: Option<&str>) -> Option<String> {
    if let Some(endpoint) = explicit {
        return Some(endpoint.to_string());
    }

    std::env::var(ENDPOINT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
