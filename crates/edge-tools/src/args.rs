//! Typed access to tool call arguments.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parsed tool arguments, as handed to a tool callback in JSON text form.
#[derive(Debug, Clone)]
pub struct ToolArgs {
    value: Value,
    valid: bool,
}

impl ToolArgs {
    /// Parse the arguments string. Invalid JSON yields an empty, invalid set.
    pub fn parse(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(value) => Self { value, valid: true },
            Err(e) => {
                tracing::debug!("Invalid tool arguments: {e}");
                Self {
                    value: Value::Null,
                    valid: false,
                }
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        Self { value, valid: true }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Deserialize `key` into `T`, falling back to `default` when it is
    /// missing or has the wrong shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.value(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(default)
    }

    /// Raw JSON value stored under `key`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    pub fn is_array(&self, key: &str) -> bool {
        self.value(key).is_some_and(Value::is_array)
    }

    /// Length of the array under `key`, 0 when absent or not an array.
    pub fn array_len(&self, key: &str) -> usize {
        self.value(key)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.value.as_object()
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        self.value.as_array()
    }

    /// Compact JSON for logging.
    pub fn debug_json(&self) -> String {
        if self.valid {
            self.value.to_string()
        } else {
            r#"{"error":"Invalid JSON document in tool arguments"}"#.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_get_with_default() {
        let args = ToolArgs::parse(r#"{"a":1,"b":2.5,"name":"x"}"#);
        assert!(args.is_valid());
        assert_eq!(args.get("a", 0i64), 1);
        assert_eq!(args.get("b", 0.0f64), 2.5);
        assert_eq!(args.get("name", String::new()), "x");
        assert_eq!(args.get("missing", 7i64), 7);
        assert_eq!(args.get("name", 9i64), 9);
    }

    #[test]
    fn test_arrays() {
        let args = ToolArgs::parse(r#"{"items":[1,2,3],"one":1}"#);
        assert!(args.is_array("items"));
        assert!(!args.is_array("one"));
        assert_eq!(args.array_len("items"), 3);
        assert_eq!(args.array_len("one"), 0);
    }

    #[test]
    fn test_invalid_json() {
        let args = ToolArgs::parse("{oops");
        assert!(!args.is_valid());
        assert!(!args.contains("a"));
        assert!(args.debug_json().contains("Invalid JSON"));
    }

    #[test]
    fn test_from_value() {
        let args = ToolArgs::from_value(serde_json::json!({"count": 3, "tags": ["a"]}));
        assert!(args.is_valid());
        assert_eq!(args.get("count", 0u32), 3);
        assert_eq!(args.get("tags", Vec::<String>::new()), vec!["a".to_string()]);
    }

    #[test]
    fn test_root_array() {
        let args = ToolArgs::parse("[1,2]");
        assert!(args.as_object().is_none());
        assert_eq!(args.as_array().map(Vec::len), Some(2));
    }
}
