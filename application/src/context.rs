//! Execution Context: the scope of one tool invocation.
//!
//! Built by the caller (the runner, a route handler, a test), never by a
//! tool. Read-only once built; a run may reuse one context for all its calls.

use crate::ports::database::DatabaseOperations;
use crate::ports::workspace_executor::WorkspaceExecutor;
use board_domain::{ToolDefinition, ToolError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Serializable description of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub root_path: PathBuf,
    pub branch: String,
    pub remote: String,
    /// Persona the acting agent runs as
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
}

impl WorkspaceInfo {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            branch: "main".to_string(),
            remote: "origin".to_string(),
            persona_id: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_persona(mut self, persona_id: impl Into<String>) -> Self {
        self.persona_id = Some(persona_id.into());
        self
    }
}

/// A checkout plus the capability to act on it.
#[derive(Clone)]
pub struct Workspace {
    pub info: WorkspaceInfo,
    pub executor: Arc<dyn WorkspaceExecutor>,
}

impl Workspace {
    pub fn new(info: WorkspaceInfo, executor: Arc<dyn WorkspaceExecutor>) -> Self {
        Self { info, executor }
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("info", &self.info)
            .field("executor_root", &self.executor.root())
            .finish()
    }
}

#[derive(Clone)]
pub struct ExecutionContext {
    project_id: String,
    ticket_id: Option<String>,
    workspace: Workspace,
    db: Option<Arc<dyn DatabaseOperations>>,
    profile: Option<String>,
}

impl ExecutionContext {
    pub fn builder(project_id: impl Into<String>, workspace: Workspace) -> ExecutionContextBuilder {
        ExecutionContextBuilder {
            context: ExecutionContext {
                project_id: project_id.into(),
                ticket_id: None,
                workspace,
                db: None,
                profile: None,
            },
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn ticket_id(&self) -> Option<&str> {
        self.ticket_id.as_deref()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn executor(&self) -> &dyn WorkspaceExecutor {
        self.workspace.executor.as_ref()
    }

    pub fn persona_id(&self) -> Option<&str> {
        self.workspace.info.persona_id.as_deref()
    }

    pub fn db(&self) -> Option<&Arc<dyn DatabaseOperations>> {
        self.db.as_ref()
    }

    /// Profile the current run is confined to
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// An explicit ticket id from the call wins over the ambient one.
    pub fn resolve_ticket_id(&self, explicit: Option<&str>) -> Result<String, ToolError> {
        explicit
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or(self.ticket_id())
            .map(str::to_string)
            .ok_or_else(|| ToolError::missing_context("ticket id (pass ticket_id explicitly)"))
    }

    pub fn require_persona_id(&self) -> Result<&str, ToolError> {
        self.persona_id()
            .ok_or_else(|| ToolError::missing_context("persona id for the acting agent"))
    }

    pub fn require_db(&self) -> Result<&Arc<dyn DatabaseOperations>, ToolError> {
        self.db
            .as_ref()
            .ok_or_else(|| ToolError::missing_context("database handle"))
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("project_id", &self.project_id)
            .field("ticket_id", &self.ticket_id)
            .field("workspace", &self.workspace)
            .field("has_db", &self.db.is_some())
            .field("profile", &self.profile)
            .finish()
    }
}

pub struct ExecutionContextBuilder {
    context: ExecutionContext,
}

impl ExecutionContextBuilder {
    pub fn ticket_id(mut self, ticket_id: impl Into<String>) -> Self {
        self.context.ticket_id = Some(ticket_id.into());
        self
    }

    pub fn maybe_ticket_id(mut self, ticket_id: Option<String>) -> Self {
        self.context.ticket_id = ticket_id;
        self
    }

    pub fn db(mut self, db: Arc<dyn DatabaseOperations>) -> Self {
        self.context.db = Some(db);
        self
    }

    pub fn maybe_db(mut self, db: Option<Arc<dyn DatabaseOperations>>) -> Self {
        self.context.db = db;
        self
    }

    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.context.profile = Some(profile.into());
        self
    }

    pub fn build(self) -> ExecutionContext {
        self.context
    }
}

/// Validate raw arguments against a tool's schema and deserialize them into
/// the tool's typed parameter struct.
pub fn parse_params<T: DeserializeOwned>(
    definition: &ToolDefinition,
    raw: &serde_json::Value,
) -> Result<T, ToolError> {
    let validated = definition
        .parameters()
        .validate(raw)
        .map_err(|msg| ToolError::invalid_argument(format!("{}: {}", definition.name(), msg)))?;

    serde_json::from_value(serde_json::Value::Object(validated)).map_err(|e| {
        ToolError::invalid_argument(format!("{}: {}", definition.name(), e))
    })
}
