//! Tool: echo — Return the given message unchanged.

use edge_tools::{ToolArgs, ToolRegistry, ToolResult};

use crate::types::McpResult;

pub const NAME: &str = "echo";

pub fn register(tools: &mut ToolRegistry) -> McpResult<()> {
    tools.register_simple(
        NAME,
        "Return the given message unchanged",
        "message",
        "Text to echo back",
        "string",
        execute,
    )?;
    Ok(())
}

pub fn execute(arguments: &str) -> ToolResult {
    let args = ToolArgs::parse(arguments);
    match args.value("message").and_then(|v| v.as_str()) {
        Some(message) => ToolResult::success(message),
        None => ToolResult::error("Missing required parameter: message"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_message() {
        let result = execute(r#"{"message":"hello"}"#);
        assert!(!result.is_error);
        assert_eq!(result.first_text(), Some("hello"));
    }

    #[test]
    fn test_missing_message() {
        assert!(execute("{}").is_error);
        assert!(execute("not json").is_error);
    }
}
