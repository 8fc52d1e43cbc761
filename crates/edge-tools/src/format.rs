//! Presentation helper for JSON-looking tool output.
//!
//! Pure formatting: the output carries the same JSON meaning as the input.

use serde_json::Value;

/// Whether the trimmed text is brace-delimited like a JSON object.
pub fn looks_like_object(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.starts_with('{') && trimmed.ends_with('}')
}

/// Pretty-print a JSON object with one top-level key per line.
///
/// Nested objects and arrays stay compact. Text that does not parse as a
/// JSON object is returned unchanged.
pub fn pretty_object(text: &str) -> String {
    if text.is_empty() {
        return "{}".to_string();
    }

    let map = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => return text.to_string(),
    };

    if map.is_empty() {
        return "{}".to_string();
    }

    let lines: Vec<String> = map
        .iter()
        .map(|(key, value)| format!("  {}: {value}", Value::String(key.clone())))
        .collect();

    format!("{{\n{}\n}}", lines.join(",\n"))
}
