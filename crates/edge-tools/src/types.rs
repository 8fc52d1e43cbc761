//! Core data types for tools and their results.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::{looks_like_object, pretty_object};

/// Content type used for every item produced by the text constructors.
pub const TEXT_CONTENT: &str = "text";

/// A single content item within a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: TEXT_CONTENT.to_string(),
            text: text.into(),
        }
    }
}

/// Outcome of a tool invocation, serialized as the `tools/call` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    /// Build a result from a single text value.
    ///
    /// Text that looks like a JSON object is pretty-printed, one key per line.
    pub fn text(text: impl Into<String>, is_error: bool) -> Self {
        let text = text.into();
        let text = if looks_like_object(&text) {
            pretty_object(&text)
        } else {
            text
        };
        Self {
            content: vec![ContentItem::text(text)],
            is_error,
        }
    }

    /// Build a successful result.
    pub fn success(text: impl Into<String>) -> Self {
        Self::text(text, false)
    }

    /// Build an error result; the message is stored verbatim.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(message)],
            is_error: true,
        }
    }

    /// Build a result from a JSON value.
    pub fn from_json(value: &Value, is_error: bool) -> Self {
        Self::text(value.to_string(), is_error)
    }

    /// Text of the first content item, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|item| item.text.as_str())
    }
}

/// Callback invoked with the call's arguments serialized as a JSON string.
pub type ToolCallback = Arc<dyn Fn(&str) -> ToolResult + Send + Sync>;

/// A named, schema-described tool exposed to the MCP server.
#[derive(Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub callback: Option<ToolCallback>,
}

impl Tool {
    /// Create a tool with no callback attached yet.
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            callback: None,
        }
    }

    /// Attach the invocation callback.
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) -> ToolResult + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

/// Errors raised while registering tools.
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("Tool name must not be empty")]
    EmptyName,

    #[error("Invalid input schema: {0}")]
    InvalidSchema(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_object_is_pretty_printed() {
        let result = ToolResult::text("{\"result\":3}", false);
        assert_eq!(result.first_text(), Some("{\n  \"result\": 3\n}"));
        assert!(!result.is_error);
    }

    #[test]
    fn test_text_keeps_wide_integers() {
        let result = ToolResult::text(r#"{"serial":123456789012345678901234567890,"v":1.50}"#, false);
        assert_eq!(
            result.first_text(),
            Some("{\n  \"serial\": 123456789012345678901234567890,\n  \"v\": 1.50\n}")
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        let result = ToolResult::text("  hello {world}", false);
        assert_eq!(result.first_text(), Some("  hello {world}"));
    }

    #[test]
    fn test_error_is_verbatim() {
        let result = ToolResult::error("{\"a\":1}");
        assert_eq!(result.first_text(), Some("{\"a\":1}"));
        assert!(result.is_error);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(ToolResult::success("ok")).unwrap();
        assert_eq!(
            value,
            json!({"content": [{"type": "text", "text": "ok"}], "isError": false})
        );
    }

    #[test]
    fn test_from_json_keeps_key_order() {
        let result = ToolResult::from_json(&json!({"success": true, "result": 2}), false);
        assert_eq!(
            result.first_text(),
            Some("{\n  \"success\": true,\n  \"result\": 2\n}")
        );
    }
}
