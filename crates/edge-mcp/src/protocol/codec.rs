//! JSON-RPC text codec for WebSocket frames.

use serde::Serialize;
use serde_json::Value;

use crate::types::{
    JsonRpcError, JsonRpcErrorObject, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    McpError, McpResult, RequestId, JSONRPC_VERSION,
};

/// Decode a text frame into a request or notification.
pub fn decode(text: &str) -> McpResult<JsonRpcRequest> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("Empty message".to_string()));
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| McpError::ParseError(e.to_string()))?;

    match value.get("method") {
        Some(Value::String(method)) if !method.is_empty() => {}
        Some(_) => {
            return Err(McpError::InvalidRequest(
                "Method must be a non-empty string".to_string(),
            ))
        }
        None => {
            return Err(McpError::InvalidRequest(
                "Not a request: missing method".to_string(),
            ))
        }
    }

    let request: JsonRpcRequest =
        serde_json::from_value(value).map_err(|e| McpError::InvalidRequest(e.to_string()))?;

    if request.jsonrpc != JSONRPC_VERSION {
        tracing::warn!(
            "Expected jsonrpc version \"{JSONRPC_VERSION}\", got \"{}\"; handling anyway",
            request.jsonrpc
        );
    }

    Ok(request)
}

/// Encode a success response.
pub fn encode_result(id: &RequestId, result: Value) -> McpResult<String> {
    to_text(&JsonRpcResponse::new(id.clone(), result))
}

/// Encode an error response.
pub fn encode_error(id: &RequestId, error: JsonRpcErrorObject) -> McpResult<String> {
    to_text(&JsonRpcError::new(id.clone(), error))
}

/// Encode a notification.
pub fn encode_notification(method: &str, params: Option<Value>) -> McpResult<String> {
    to_text(&JsonRpcNotification::new(method.to_string(), params))
}

fn to_text(message: &impl Serialize) -> McpResult<String> {
    serde_json::to_string(message).map_err(McpError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_request() {
        let request = decode(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#).unwrap();
        assert_eq!(request.method, "ping");
        assert_eq!(request.id, Some(RequestId::from(1)));
        assert!(request.params.is_none());
    }

    #[test]
    fn test_decode_notification() {
        let request = decode(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.is_notification());

        let null_id = decode(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(null_id.is_notification());
    }

    #[test]
    fn test_decode_malformed() {
        let err = decode(r#"{"broken":"#).unwrap_err();
        assert_eq!(err.code(), -32700);
        assert!(decode("").is_err());
        assert!(decode("   ").is_err());
    }

    #[test]
    fn test_decode_non_request() {
        let err = decode(r#"{"jsonrpc":"2.0","id":3,"result":{}}"#).unwrap_err();
        assert!(matches!(err, McpError::InvalidRequest(_)));
        assert!(decode(r#"{"jsonrpc":"2.0","id":3,"method":""}"#).is_err());
        assert!(decode(r#"{"jsonrpc":"2.0","id":3,"method":7}"#).is_err());
        assert!(decode("[1,2,3]").is_err());
    }

    #[test]
    fn test_ids_keep_type_and_literal() {
        let numeric = decode(r#"{"jsonrpc":"2.0","id":48,"method":"ping"}"#).unwrap();
        let text = encode_result(numeric.id.as_ref().unwrap(), json!({})).unwrap();
        assert_eq!(text, r#"{"jsonrpc":"2.0","id":48,"result":{}}"#);

        let string = decode(r#"{"jsonrpc":"2.0","id":"48","method":"ping"}"#).unwrap();
        let text = encode_result(string.id.as_ref().unwrap(), json!({})).unwrap();
        assert_eq!(text, r#"{"jsonrpc":"2.0","id":"48","result":{}}"#);
    }

    #[test]
    fn test_wide_and_fractional_ids_keep_literal() {
        for literal in ["123456789012345678901234567890", "1.50", "1e2"] {
            let request =
                decode(&format!(r#"{{"jsonrpc":"2.0","id":{literal},"method":"ping"}}"#)).unwrap();
            let id = request.id.unwrap();
            assert_eq!(id.to_string(), literal);
            let text = encode_result(&id, json!({})).unwrap();
            assert_eq!(text, format!(r#"{{"jsonrpc":"2.0","id":{literal},"result":{{}}}}"#));
        }
    }

    #[test]
    fn test_non_scalar_id_rejected() {
        let err = decode(r#"{"jsonrpc":"2.0","id":true,"method":"ping"}"#).unwrap_err();
        assert!(matches!(err, McpError::InvalidRequest(_)));
    }

    #[test]
    fn test_encode_error() {
        let error = McpError::InternalError("boom".to_string()).to_error_object();
        let text = encode_error(&RequestId::from(5), error).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["error"]["code"], -32603);
        assert_eq!(value["id"], 5);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_encode_notification() {
        let text = encode_notification("notifications/initialized", None).unwrap();
        assert_eq!(
            text,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#
        );
    }

    #[test]
    fn test_control_characters_escaped() {
        let text = encode_result(&RequestId::from("x"), json!({"t": "a\"b\\c\n\t\u{8}\u{c}\r"}))
            .unwrap();
        assert_eq!(
            text,
            r#"{"jsonrpc":"2.0","id":"x","result":{"t":"a\"b\\c\n\t\b\f\r"}}"#
        );
    }
}
