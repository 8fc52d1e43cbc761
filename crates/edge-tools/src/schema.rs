//! Input schema helpers.

use serde_json::{json, Value};

use crate::types::{RegistryError, RegistryResult};

/// Build a single-parameter object schema with the parameter marked required.
pub fn simple_schema(param_name: &str, param_description: &str, param_type: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            param_name: {
                "type": param_type,
                "description": param_description
            }
        },
        "required": [param_name]
    })
}

/// Parse a schema supplied as JSON text. The schema must be a JSON object.
pub fn parse_schema(text: &str) -> RegistryResult<Value> {
    let value: Value = serde_json::from_str(text)?;
    ensure_object(value)
}

pub(crate) fn ensure_object(value: Value) -> RegistryResult<Value> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(RegistryError::InvalidSchema(format!(
            "expected a JSON object, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_schema_shape() {
        let schema = simple_schema("city", "City name", "string");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["city"]["type"], "string");
        assert_eq!(schema["properties"]["city"]["description"], "City name");
        assert_eq!(schema["required"], json!(["city"]));
    }

    #[test]
    fn test_simple_schema_escapes_text() {
        let schema = simple_schema("q", "say \"hi\"", "string");
        let text = schema.to_string();
        assert!(text.contains(r#""description":"say \"hi\"""#));
    }

    #[test]
    fn test_parse_schema() {
        assert!(parse_schema(r#"{"type":"object"}"#).is_ok());
        assert!(matches!(
            parse_schema("[1]"),
            Err(RegistryError::InvalidSchema(_))
        ));
        assert!(matches!(parse_schema("{broken"), Err(RegistryError::Json(_))));
    }
}
