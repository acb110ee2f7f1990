//! Introspection tool: list_my_tools

use board_application::context::{ExecutionContext, parse_params};
use board_application::ports::profile_catalog::ProfileCatalog;
use board_domain::{FieldKind, ObjectSchema, ToolDefinition, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Tool name constant
pub const LIST_MY_TOOLS: &str = "list_my_tools";

pub fn list_my_tools_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_MY_TOOLS,
        "List the tools a role may use. Defaults to your own role.",
        ObjectSchema::new().optional("role", FieldKind::String, "Role/profile name"),
    )
}

#[derive(Debug, Deserialize)]
struct ListMyToolsParams {
    role: Option<String>,
}

pub struct ListMyToolsTool {
    definition: ToolDefinition,
    catalog: Arc<dyn ProfileCatalog>,
}

impl ListMyToolsTool {
    pub fn new(catalog: Arc<dyn ProfileCatalog>) -> Self {
        Self {
            definition: list_my_tools_definition(),
            catalog,
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: ListMyToolsParams = parse_params(&self.definition, &params)?;
        let role = params
            .role
            .as_deref()
            .or(ctx.profile())
            .ok_or_else(|| ToolError::missing_context("profile (pass role explicitly)"))?;

        let profile = self.catalog.profile(role).ok_or_else(|| {
            ToolError::not_found(format!(
                "role '{}' (known: {})",
                role,
                self.catalog.profile_names().join(", ")
            ))
        })?;

        let output = serde_json::to_string_pretty(&json!({
            "role": profile.name,
            "tools": profile.tools,
        }))
        .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        Ok(ToolResult::success(LIST_MY_TOOLS, output))
    }
}

impl_tool!(ListMyToolsTool);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::StaticProfileCatalog;
    use crate::tools::test_support::workspace_in;
    use board_application::ports::tool_executor::Tool;

    fn tool() -> ListMyToolsTool {
        ListMyToolsTool::new(Arc::new(StaticProfileCatalog::builtin()))
    }

    #[tokio::test]
    async fn test_falls_back_to_context_profile() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ExecutionContext::builder("P-1", workspace_in(dir.path(), None))
            .profile("reviewer")
            .build();

        let result = tool().handle(json!({}), &ctx).await;
        let listed: Value = serde_json::from_str(&result.output).unwrap();

        assert_eq!(listed["role"], "reviewer");
        assert!(
            listed["tools"]
                .as_array()
                .unwrap()
                .contains(&json!("list_my_tools"))
        );
    }

    #[tokio::test]
    async fn test_explicit_role_wins() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ExecutionContext::builder("P-1", workspace_in(dir.path(), None))
            .profile("reviewer")
            .build();

        let result = tool().handle(json!({"role": "developer"}), &ctx).await;
        let listed: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(listed["role"], "developer");
    }

    #[tokio::test]
    async fn test_no_role_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ExecutionContext::builder("P-1", workspace_in(dir.path(), None)).build();

        let result = tool().handle(json!({}), &ctx).await;
        assert_eq!(result.error().unwrap().code, "MISSING_CONTEXT");
    }

    #[tokio::test]
    async fn test_unknown_role() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ExecutionContext::builder("P-1", workspace_in(dir.path(), None)).build();

        let result = tool().handle(json!({"role": "ceo"}), &ctx).await;
        let err = result.error().unwrap();
        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("developer"));
    }
}
