//! Tool and Tool Executor ports
//!
//! [`Tool`] is the executable half of a capability: a [`ToolDefinition`]
//! plus `handle`. [`ToolExecutorPort`] is the registry-facing view the
//! agent runner depends on.

use crate::context::ExecutionContext;
use crate::ports::tool_schema::ToolSurface;
use async_trait::async_trait;
use board_domain::{ToolCall, ToolDefinition, ToolResult};
use serde_json::Value;
use std::sync::Arc;

/// A named, schema-declaring capability.
///
/// `handle` never fails past its own boundary: malformed parameters,
/// missing context and collaborator failures all come back as a
/// [`ToolResult`] carrying an error.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        self.definition().name()
    }

    async fn handle(&self, params: Value, ctx: &ExecutionContext) -> ToolResult;
}

/// Port for resolving and executing tools.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>>;

    fn has_tool(&self, name: &str) -> bool {
        self.get_tool(name).is_some()
    }

    /// Every registered tool name, in registration order
    fn all_tool_names(&self) -> Vec<String>;

    /// Tools a profile may call, in the profile's order
    fn tools_for_profile(&self, profile: &str) -> Vec<Arc<dyn Tool>>;

    /// `{name, description, parameters}` triples for a profile's tools
    fn tool_surfaces_for_profile(&self, profile: &str) -> Vec<ToolSurface>;

    /// Execute a call. Unknown tools yield a `NOT_FOUND` result.
    async fn execute(&self, call: &ToolCall, ctx: &ExecutionContext) -> ToolResult;
}
