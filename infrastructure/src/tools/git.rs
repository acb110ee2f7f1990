//! Version control tools: git_status, git_diff, git_commit, git_push
//!
//! Thin wrappers that run `git` through the workspace executor with the
//! configured command timeout.

use super::command::command_result;
use board_application::config::ExecutionParams;
use board_application::context::{ExecutionContext, parse_params};
use board_application::ports::workspace_executor::{CommandOutput, RunOptions};
use board_domain::{FieldKind, ObjectSchema, ToolDefinition, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::Value;

/// Tool name constants
pub const GIT_STATUS: &str = "git_status";
pub const GIT_DIFF: &str = "git_diff";
pub const GIT_COMMIT: &str = "git_commit";
pub const GIT_PUSH: &str = "git_push";

pub fn git_status_definition() -> ToolDefinition {
    ToolDefinition::new(
        GIT_STATUS,
        "Show the working tree status (porcelain format, with branch line)",
        ObjectSchema::new(),
    )
}

pub fn git_diff_definition() -> ToolDefinition {
    ToolDefinition::new(
        GIT_DIFF,
        "Show uncommitted changes",
        ObjectSchema::new()
            .optional("staged", FieldKind::Boolean, "Show staged changes instead of unstaged")
            .optional("path", FieldKind::String, "Limit the diff to this path"),
    )
}

pub fn git_commit_definition() -> ToolDefinition {
    ToolDefinition::new(
        GIT_COMMIT,
        "Commit changes in the workspace",
        ObjectSchema::new()
            .required("message", FieldKind::String, "Commit message")
            .optional(
                "add_all",
                FieldKind::Boolean,
                "Stage all changes (git add -A) first; defaults to true",
            ),
    )
}

pub fn git_push_definition() -> ToolDefinition {
    ToolDefinition::new(
        GIT_PUSH,
        "Push commits to the remote. Remote and branch default to the workspace's.",
        ObjectSchema::new()
            .optional("remote", FieldKind::String, "Remote name")
            .optional("branch", FieldKind::String, "Branch name"),
    )
}

#[derive(Debug, Deserialize)]
struct GitDiffParams {
    #[serde(default)]
    staged: bool,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitCommitParams {
    message: String,
    add_all: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GitPushParams {
    remote: Option<String>,
    branch: Option<String>,
}

async fn git(
    ctx: &ExecutionContext,
    params: &ExecutionParams,
    args: &[&str],
) -> Result<CommandOutput, ToolError> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    Ok(ctx
        .executor()
        .run(
            "git",
            &args,
            RunOptions::with_timeout(params.command_timeout),
        )
        .await?)
}

pub struct GitStatusTool {
    definition: ToolDefinition,
    params: ExecutionParams,
}

impl GitStatusTool {
    pub fn new(params: ExecutionParams) -> Self {
        Self {
            definition: git_status_definition(),
            params,
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let _: serde_json::Map<String, Value> = parse_params(&self.definition, &params)?;
        let output = git(ctx, &self.params, &["status", "--porcelain=v1", "--branch"]).await?;
        Ok(command_result(GIT_STATUS, output))
    }
}

pub struct GitDiffTool {
    definition: ToolDefinition,
    params: ExecutionParams,
}

impl GitDiffTool {
    pub fn new(params: ExecutionParams) -> Self {
        Self {
            definition: git_diff_definition(),
            params,
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: GitDiffParams = parse_params(&self.definition, &params)?;

        let mut args = vec!["diff"];
        if params.staged {
            args.push("--staged");
        }
        if let Some(path) = params.path.as_deref() {
            args.push("--");
            args.push(path);
        }

        let output = git(ctx, &self.params, &args).await?;
        let mut result = command_result(GIT_DIFF, output);
        if result.is_success() && result.output.is_empty() {
            result.output = "No changes".to_string();
        }
        Ok(result)
    }
}

pub struct GitCommitTool {
    definition: ToolDefinition,
    params: ExecutionParams,
}

impl GitCommitTool {
    pub fn new(params: ExecutionParams) -> Self {
        Self {
            definition: git_commit_definition(),
            params,
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: GitCommitParams = parse_params(&self.definition, &params)?;
        if params.message.trim().is_empty() {
            return Err(ToolError::invalid_argument("git_commit: message must not be empty"));
        }

        if params.add_all.unwrap_or(true) {
            let staged = git(ctx, &self.params, &["add", "-A"]).await?;
            if !staged.success() {
                return Ok(command_result(GIT_COMMIT, staged));
            }
        }

        let output = git(ctx, &self.params, &["commit", "-m", &params.message]).await?;
        Ok(command_result(GIT_COMMIT, output))
    }
}

pub struct GitPushTool {
    definition: ToolDefinition,
    params: ExecutionParams,
}

impl GitPushTool {
    pub fn new(params: ExecutionParams) -> Self {
        Self {
            definition: git_push_definition(),
            params,
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: GitPushParams = parse_params(&self.definition, &params)?;
        let info = &ctx.workspace().info;
        let remote = params.remote.unwrap_or_else(|| info.remote.clone());
        let branch = params.branch.unwrap_or_else(|| info.branch.clone());

        let output = git(ctx, &self.params, &["push", &remote, &branch]).await?;
        Ok(command_result(GIT_PUSH, output).with_extra(serde_json::json!({
            "remote": remote,
            "branch": branch,
        })))
    }
}

impl_tool!(GitStatusTool, GitDiffTool, GitCommitTool, GitPushTool);
