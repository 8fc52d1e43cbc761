//! MCP capability and initialization types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "edge-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub experimental: Map<String, Value>,
    pub prompts: PromptsCapability,
    pub resources: ResourcesCapability,
    pub tools: ToolsCapability,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptsCapability {
    #[serde(default)]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    #[serde(default)]
    pub subscribe: bool,
    #[serde(default)]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    #[serde(default)]
    pub list_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
}

impl InitializeResult {
    pub fn new(protocol_version: &str, name: &str, version: &str) -> Self {
        Self {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: Implementation {
                name: name.to_string(),
                version: version.to_string(),
            },
        }
    }

    pub fn default_result() -> Self {
        Self::new(MCP_VERSION, SERVER_NAME, SERVER_VERSION)
    }
}
