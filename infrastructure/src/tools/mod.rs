//! Tool implementations for the agent system
//!
//! Every tool is a struct holding its [`ToolDefinition`] plus whatever
//! collaborators it needs at construction time (execution limits, the state
//! machine, the profile catalog). Per-call scope arrives through the
//! [`ExecutionContext`].
//!
//! ## Catalogue
//!
//! - `file`: read_file, write_file, edit_file, list_files
//! - `command`: run_command
//! - `git`: git_status, git_diff, git_commit, git_push
//! - `ticket`: get_ticket, update_ticket_state
//! - `comment`: post_comment
//! - `document`: save_document
//! - `introspection`: list_my_tools
//!
//! [`ToolDefinition`]: board_domain::ToolDefinition
//! [`ExecutionContext`]: board_application::ExecutionContext

/// Implement [`Tool`](board_application::Tool) for structs that carry a
/// `definition` field and an `execute` method returning
/// `Result<ToolResult, ToolError>`; errors become failed results.
macro_rules! impl_tool {
    ($($tool:ty),+ $(,)?) => {
        $(
            #[async_trait::async_trait]
            impl board_application::ports::tool_executor::Tool for $tool {
                fn definition(&self) -> &board_domain::ToolDefinition {
                    &self.definition
                }

                async fn handle(
                    &self,
                    params: serde_json::Value,
                    ctx: &board_application::context::ExecutionContext,
                ) -> board_domain::ToolResult {
                    match self.execute(params, ctx).await {
                        Ok(result) => result,
                        Err(err) => board_domain::ToolResult::failure(self.definition.name(), err),
                    }
                }
            }
        )+
    };
}

pub mod command;
pub mod comment;
pub mod document;
pub mod file;
pub mod git;
pub mod introspection;
pub mod registry;
pub mod schema;
pub mod ticket;

pub use registry::{RegistryError, RegistryStats, ToolRegistry};
pub use schema::JsonSchemaToolConverter;

use board_application::config::ExecutionParams;
use board_application::ports::profile_catalog::ProfileCatalog;
use board_application::ports::tool_executor::Tool;
use board_application::use_cases::transition_ticket::TicketStateMachine;
use std::sync::Arc;

/// Names of [`builtin_tools`], in the same order
pub const BUILTIN_TOOL_NAMES: [&str; 14] = [
    file::READ_FILE,
    file::WRITE_FILE,
    file::EDIT_FILE,
    file::LIST_FILES,
    command::RUN_COMMAND,
    git::GIT_STATUS,
    git::GIT_DIFF,
    git::GIT_COMMIT,
    git::GIT_PUSH,
    ticket::GET_TICKET,
    ticket::UPDATE_TICKET_STATE,
    comment::POST_COMMENT,
    document::SAVE_DOCUMENT,
    introspection::LIST_MY_TOOLS,
];

/// Every built-in tool, in catalogue order
pub fn builtin_tools(
    catalog: Arc<dyn ProfileCatalog>,
    state_machine: TicketStateMachine,
    params: ExecutionParams,
) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(file::ReadFileTool::new()),
        Arc::new(file::WriteFileTool::new()),
        Arc::new(file::EditFileTool::new()),
        Arc::new(file::ListFilesTool::new()),
        Arc::new(command::RunCommandTool::new(params.clone())),
        Arc::new(git::GitStatusTool::new(params.clone())),
        Arc::new(git::GitDiffTool::new(params.clone())),
        Arc::new(git::GitCommitTool::new(params.clone())),
        Arc::new(git::GitPushTool::new(params)),
        Arc::new(ticket::GetTicketTool::new()),
        Arc::new(ticket::UpdateTicketStateTool::new(state_machine)),
        Arc::new(comment::PostCommentTool::new()),
        Arc::new(document::SaveDocumentTool::new()),
        Arc::new(introspection::ListMyToolsTool::new(catalog)),
    ]
}

/// Register the built-in tools and every catalog profile, failing fast on a
/// duplicate name or a profile that allows an unknown tool.
pub fn build_registry(
    catalog: Arc<dyn ProfileCatalog>,
    state_machine: TicketStateMachine,
    params: ExecutionParams,
) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    for tool in builtin_tools(catalog.clone(), state_machine, params) {
        registry.register(tool)?;
    }
    registry.load_profiles(catalog.as_ref())?;

    let stats = registry.stats();
    tracing::info!(
        tools = stats.total_tools,
        profiles = stats.total_profiles,
        "Tool registry ready"
    );
    Ok(registry)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::workspace::LocalWorkspaceExecutor;
    use board_application::context::{ExecutionContext, Workspace, WorkspaceInfo};
    use board_application::ports::database::DatabaseOperations;
    use std::path::Path;
    use std::sync::Arc;

    pub fn workspace_in(root: &Path, persona: Option<&str>) -> Workspace {
        let mut info = WorkspaceInfo::new(root);
        if let Some(p) = persona {
            info = info.with_persona(p);
        }
        Workspace::new(info, Arc::new(LocalWorkspaceExecutor::new(root)))
    }

    /// Context for project `P-1`, ambient ticket `T-1`
    pub fn context(workspace: Workspace, db: Option<Arc<dyn DatabaseOperations>>) -> ExecutionContext {
        ExecutionContext::builder("P-1", workspace)
            .ticket_id("T-1")
            .maybe_db(db)
            .build()
    }
}
