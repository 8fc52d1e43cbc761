//! Request dispatcher. Turns inbound JSON-RPC text into reply frames.

use serde_json::{json, Value};

use edge_tools::{ToolRegistry, ToolResult};

use crate::config::ServerIdentity;
use crate::types::{
    JsonRpcRequest, McpError, McpResult, ToolCallParams, ToolDefinition, ToolListResult,
};

use super::codec;
use super::negotiation::negotiate;

/// Notification sent right after answering `initialize`.
pub const INITIALIZED_NOTIFICATION: &str = "notifications/initialized";

/// What the connection layer must do after one inbound message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Encoded frames to send, in order.
    pub replies: Vec<String>,
    /// The message was a heartbeat `ping`.
    pub heartbeat: bool,
}

/// Dispatches the fixed MCP method set against a tool registry.
#[derive(Debug, Clone, Default)]
pub struct ProtocolHandler {
    identity: ServerIdentity,
}

impl ProtocolHandler {
    pub fn new(identity: ServerIdentity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Decode and handle one text frame. Undecodable frames are logged and dropped.
    pub fn handle_text(&self, text: &str, tools: &ToolRegistry) -> Dispatch {
        match codec::decode(text) {
            Ok(request) => self.handle_request(request, tools),
            Err(e) => {
                tracing::warn!("Dropping inbound message: {e}");
                Dispatch::default()
            }
        }
    }

    /// Handle a decoded request. Unknown methods produce no reply.
    pub fn handle_request(&self, request: JsonRpcRequest, tools: &ToolRegistry) -> Dispatch {
        let mut dispatch = Dispatch::default();

        let result = match request.method.as_str() {
            "ping" => {
                dispatch.heartbeat = true;
                tracing::debug!("Received ping: {}", describe_id(&request));
                Ok(json!({}))
            }
            "initialize" => self.handle_initialize(request.params.clone()),
            "tools/list" => self.handle_tools_list(tools),
            "tools/call" => self.handle_tools_call(request.params.clone(), tools),
            other => {
                tracing::debug!("Ignoring unsupported method: {other}");
                return dispatch;
            }
        };

        let Some(id) = request.id.as_ref() else {
            tracing::debug!("{} sent as notification, no reply", request.method);
            return dispatch;
        };

        let reply = match result {
            Ok(value) => codec::encode_result(id, value),
            Err(e) => {
                tracing::error!("Failed to handle {}: {e}", request.method);
                codec::encode_error(id, e.to_error_object())
            }
        };

        match reply {
            Ok(text) => dispatch.replies.push(text),
            Err(e) => tracing::error!("Failed to encode reply to {}: {e}", request.method),
        }

        if request.method == "initialize" {
            match codec::encode_notification(INITIALIZED_NOTIFICATION, None) {
                Ok(text) => dispatch.replies.push(text),
                Err(e) => tracing::error!("Failed to encode {INITIALIZED_NOTIFICATION}: {e}"),
            }
        }

        dispatch
    }

    fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let result = negotiate(params, &self.identity);
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_tools_list(&self, tools: &ToolRegistry) -> McpResult<Value> {
        let result = ToolListResult {
            tools: tools.iter().map(ToolDefinition::from).collect(),
        };
        tracing::info!("Listing {} tools", result.tools.len());
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_tools_call(&self, params: Option<Value>, tools: &ToolRegistry) -> McpResult<Value> {
        let result = match parse_call_params(params) {
            Ok(call) => {
                tracing::info!("Tool call: {}", call.name);
                let arguments = call.arguments.unwrap_or_else(|| json!({}));
                let result = tools.invoke(&call.name, &arguments);
                tracing::info!(
                    "Tool call finished: {}{}",
                    call.name,
                    if result.is_error { " (error)" } else { "" }
                );
                result
            }
            Err(e) => {
                tracing::warn!("Rejecting tools/call: {e}");
                ToolResult::from_json(&json!({ "error": e.to_string() }), true)
            }
        };

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

fn parse_call_params(params: Option<Value>) -> McpResult<ToolCallParams> {
    params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams("Tool call params required".to_string()))
}

fn describe_id(request: &JsonRpcRequest) -> String {
    request
        .id
        .as_ref()
        .map_or_else(|| "<notification>".to_string(), ToString::to_string)
}
