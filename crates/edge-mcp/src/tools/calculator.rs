//! Tool: calculator — Basic arithmetic on two numbers.

use serde_json::json;

use edge_tools::{Tool, ToolArgs, ToolRegistry, ToolResult};

use crate::types::McpResult;

pub const NAME: &str = "calculator";

pub fn register(tools: &mut ToolRegistry) -> McpResult<()> {
    let schema = json!({
        "type": "object",
        "properties": {
            "operation": {
                "type": "string",
                "enum": ["add", "subtract", "multiply", "divide"],
                "description": "Operation to apply"
            },
            "a": { "type": "number", "description": "Left operand" },
            "b": { "type": "number", "description": "Right operand" }
        },
        "required": ["operation", "a", "b"]
    });
    tools.register(
        Tool::new(NAME, "Add, subtract, multiply, or divide two numbers", schema)
            .with_callback(execute),
    )?;
    Ok(())
}

pub fn execute(arguments: &str) -> ToolResult {
    let args = ToolArgs::parse(arguments);
    let (Some(a), Some(b)) = (
        args.value("a").and_then(|v| v.as_f64()),
        args.value("b").and_then(|v| v.as_f64()),
    ) else {
        return ToolResult::from_json(&json!({ "error": "Parameters a and b must be numbers" }), true);
    };

    let operation = args.get("operation", String::new());
    let result = match operation.as_str() {
        "add" => a + b,
        "subtract" => a - b,
        "multiply" => a * b,
        "divide" if b == 0.0 => {
            return ToolResult::from_json(&json!({ "error": "Division by zero" }), true)
        }
        "divide" => a / b,
        other => {
            return ToolResult::from_json(
                &json!({ "error": format!("Unknown operation: {other}") }),
                true,
            )
        }
    };

    ToolResult::from_json(&json!({ "success": true, "result": result }), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let result = execute(r#"{"operation":"add","a":1,"b":2}"#);
        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            Some("{\n  \"success\": true,\n  \"result\": 3.0\n}")
        );
    }

    #[test]
    fn test_divide_by_zero() {
        let result = execute(r#"{"operation":"divide","a":1,"b":0}"#);
        assert!(result.is_error);
    }

    #[test]
    fn test_unknown_operation() {
        let result = execute(r#"{"operation":"pow","a":1,"b":2}"#);
        assert!(result.is_error);
        assert!(result.first_text().unwrap().contains("Unknown operation: pow"));
    }
}
