//! edge-tools: tool registry, tool results, and argument helpers for edge-mcp.

pub mod args;
pub mod format;
pub mod registry;
pub mod schema;
pub mod types;

pub use args::ToolArgs;
pub use format::{looks_like_object, pretty_object};
pub use registry::ToolRegistry;
pub use schema::{parse_schema, simple_schema};
pub use types::*;
