//! Built-in tools, registered by the `edge-mcp` binary unless disabled.

pub mod calculator;
pub mod echo;
pub mod system_time;

use edge_tools::ToolRegistry;

use crate::types::McpResult;

/// Register every built-in tool.
pub fn register_builtin(tools: &mut ToolRegistry) -> McpResult<()> {
    echo::register(tools)?;
    calculator::register(tools)?;
    system_time::register(tools)?;
    Ok(())
}
