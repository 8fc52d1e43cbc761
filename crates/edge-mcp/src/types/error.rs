//! Error types and JSON-RPC error codes for the MCP client.

use edge_tools::RegistryError;

use super::message::JsonRpcErrorObject;

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// All errors that can occur in the MCP client.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Tool registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        match self {
            McpError::ParseError(_) | McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::InvalidParams(_) | McpError::Registry(_) => INVALID_PARAMS,
            McpError::InternalError(_)
            | McpError::InvalidEndpoint(_)
            | McpError::NotConnected
            | McpError::Transport(_) => INTERNAL_ERROR,
        }
    }

    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        JsonRpcErrorObject {
            code: self.code(),
            message: self.to_string(),
            data: None,
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
