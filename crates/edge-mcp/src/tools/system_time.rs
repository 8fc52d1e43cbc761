//! Tool: system_time — Report the device's current time.

use chrono::{Local, Utc};
use serde_json::json;

use edge_tools::{Tool, ToolRegistry, ToolResult};

use crate::types::McpResult;

pub const NAME: &str = "system_time";

pub fn register(tools: &mut ToolRegistry) -> McpResult<()> {
    tools.register(
        Tool::new(
            NAME,
            "Report the current time on this device",
            json!({ "type": "object", "properties": {} }),
        )
        .with_callback(execute),
    )?;
    Ok(())
}

pub fn execute(_arguments: &str) -> ToolResult {
    let now = Utc::now();
    ToolResult::from_json(
        &json!({
            "utc": now.to_rfc3339(),
            "local": now.with_timezone(&Local).to_rfc3339(),
            "unix": now.timestamp(),
        }),
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_all_fields() {
        let result = execute("{}");
        assert!(!result.is_error);
        let text = result.first_text().unwrap();
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        assert!(value["utc"].is_string());
        assert!(value["local"].is_string());
        assert!(value["unix"].as_i64().unwrap() > 0);
    }
}
