//! Tool registration, lookup, and invocation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::{json, Value};

use crate::schema::{ensure_object, simple_schema};
use crate::types::{RegistryError, RegistryResult, Tool, ToolCallback, ToolResult};

/// Ordered registry of tools keyed by name.
///
/// Listing order is insertion order. Re-registering a name keeps its position.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing the whole record if the name already exists.
    ///
    /// Returns `true` when an existing entry was replaced.
    pub fn register(&mut self, tool: Tool) -> RegistryResult<bool> {
        if tool.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let tool = Tool {
            input_schema: ensure_object(tool.input_schema)?,
            ..tool
        };

        if let Some(existing) = self.tools.iter_mut().find(|t| t.name == tool.name) {
            tracing::info!("Updated tool: {}", tool.name);
            *existing = tool;
            return Ok(true);
        }

        tracing::info!("Registered tool: {}", tool.name);
        self.tools.push(tool);
        Ok(false)
    }

    /// Register a tool that is listed but has no callback yet.
    pub fn declare(
        &mut self,
        name: &str,
        description: &str,
        input_schema: Value,
    ) -> RegistryResult<bool> {
        self.register(Tool::new(name, description, input_schema))
    }

    /// Register a tool taking a single required parameter.
    pub fn register_simple<F>(
        &mut self,
        name: &str,
        description: &str,
        param_name: &str,
        param_description: &str,
        param_type: &str,
        callback: F,
    ) -> RegistryResult<bool>
    where
        F: Fn(&str) -> ToolResult + Send + Sync + 'static,
    {
        let schema = simple_schema(param_name, param_description, param_type);
        self.register(Tool::new(name, description, schema).with_callback(callback))
    }

    /// Replace only the callback of an existing tool.
    pub fn set_callback<F>(&mut self, name: &str, callback: F) -> bool
    where
        F: Fn(&str) -> ToolResult + Send + Sync + 'static,
    {
        match self.tools.iter_mut().find(|t| t.name == name) {
            Some(tool) => {
                tool.callback = Some(Arc::new(callback));
                tracing::info!("Updated tool callback: {name}");
                true
            }
            None => {
                tracing::warn!("Cannot set callback, tool not registered: {name}");
                false
            }
        }
    }

    /// Remove a tool by exact name.
    pub fn unregister(&mut self, name: &str) -> bool {
        match self.tools.iter().position(|t| t.name == name) {
            Some(index) => {
                self.tools.remove(index);
                tracing::info!("Unregistered tool: {name}");
                true
            }
            None => {
                tracing::warn!("Tool {name} does not exist, nothing to unregister");
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn clear(&mut self) {
        self.tools.clear();
        tracing::info!("Cleared all tools");
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    /// Invoke a tool by name.
    ///
    /// Lookup failures, missing callbacks, and panicking callbacks all come
    /// back as error results rather than Rust errors.
    pub fn invoke(&self, name: &str, arguments: &Value) -> ToolResult {
        let Some(tool) = self.get(name) else {
            tracing::warn!("Tool not found: {name}");
            return error_result(format!("Tool not found: {name}"));
        };

        let Some(callback) = tool.callback.as_ref() else {
            tracing::warn!("Tool {name} has no callback registered");
            return error_result("Tool callback not registered".to_string());
        };

        let arguments = match serde_json::to_string(arguments) {
            Ok(json) => json,
            Err(e) => return error_result(format!("Invalid arguments: {e}")),
        };

        run_callback(name, callback, &arguments)
    }
}

fn run_callback(name: &str, callback: &ToolCallback, arguments: &str) -> ToolResult {
    match catch_unwind(AssertUnwindSafe(|| callback(arguments))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("Tool {name} panicked: {reason}");
            error_result(format!("Tool callback panicked: {reason}"))
        }
    }
}

fn error_result(message: String) -> ToolResult {
    ToolResult::from_json(&json!({ "error": message }), true)
}
