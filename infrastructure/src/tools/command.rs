//! Command execution tool: run_command

use board_application::config::ExecutionParams;
use board_application::context::{ExecutionContext, parse_params};
use board_application::ports::workspace_executor::{CommandOutput, RunOptions};
use board_domain::{FieldKind, ObjectSchema, ToolDefinition, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::Value;

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Get the tool definition for run_command
pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a command in the workspace root. Without args the command is run through `sh -c`. Returns combined stdout and stderr.",
        ObjectSchema::new()
            .required("command", FieldKind::String, "Program or shell command line")
            .optional(
                "args",
                FieldKind::array(FieldKind::String),
                "Arguments passed directly to the program (no shell)",
            )
            .optional(
                "timeout_secs",
                FieldKind::Integer,
                "Timeout in seconds; capped by configuration",
            ),
    )
}

#[derive(Debug, Deserialize)]
struct RunCommandParams {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    timeout_secs: Option<u64>,
}

/// Turn finished command output into a result. A non-zero exit keeps the
/// captured output and adds a `COMMAND_FAILED` error.
pub(crate) fn command_result(tool_name: &str, output: CommandOutput) -> ToolResult {
    let combined = output.combined();
    if output.success() {
        ToolResult::success(tool_name, combined).with_exit_code(output.exit_code)
    } else {
        ToolResult::partial(tool_name, combined, ToolError::command_failed(output.exit_code))
            .with_exit_code(output.exit_code)
    }
}

pub struct RunCommandTool {
    definition: ToolDefinition,
    params: ExecutionParams,
}

impl RunCommandTool {
    pub fn new(params: ExecutionParams) -> Self {
        Self {
            definition: run_command_definition(),
            params,
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: RunCommandParams = parse_params(&self.definition, &params)?;
        if params.command.trim().is_empty() {
            return Err(ToolError::invalid_argument("run_command: command must not be empty"));
        }

        let timeout = self.params.command_timeout_for(params.timeout_secs);
        let (program, args) = if params.args.is_empty() {
            ("sh", vec!["-c".to_string(), params.command.clone()])
        } else {
            (params.command.as_str(), params.args)
        };

        let output = ctx
            .executor()
            .run(program, &args, RunOptions::with_timeout(timeout))
            .await?;
        Ok(command_result(RUN_COMMAND, output))
    }
}

impl_tool!(RunCommandTool);

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, workspace_in};
    use board_application::ports::tool_executor::Tool;
    use serde_json::json;
    use std::time::Duration;

    fn setup(params: ExecutionParams) -> (tempfile::TempDir, ExecutionContext, RunCommandTool) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(workspace_in(dir.path(), None), None);
        (dir, ctx, RunCommandTool::new(params))
    }

    #[tokio::test]
    async fn test_run_command_echo() {
        let (_dir, ctx, tool) = setup(ExecutionParams::default());
        let result = tool.handle(json!({"command": "echo hello"}), &ctx).await;

        assert!(result.is_success());
        assert_eq!(result.output, "hello");
        assert_eq!(result.metadata.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_run_command_runs_in_workspace_root() {
        let (dir, ctx, tool) = setup(ExecutionParams::default());
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let result = tool
            .handle(json!({"command": "ls", "args": ["marker.txt"]}), &ctx)
            .await;
        assert_eq!(result.output, "marker.txt");
    }

    #[tokio::test]
    async fn test_run_command_nonzero_exit_keeps_output() {
        let (_dir, ctx, tool) = setup(ExecutionParams::default());
        let result = tool
            .handle(json!({"command": "echo partial; exit 2"}), &ctx)
            .await;

        assert!(!result.is_success());
        assert_eq!(result.output, "partial");
        assert_eq!(result.error().unwrap().code, "COMMAND_FAILED");
        assert_eq!(result.metadata.exit_code, Some(2));
    }

    #[tokio::test]
    async fn test_run_command_timeout_is_capped() {
        let params = ExecutionParams::default()
            .with_command_timeout(Duration::from_secs(30))
            .with_max_command_timeout(Duration::from_millis(200));
        let (_dir, ctx, tool) = setup(params);

        let result = tool
            .handle(json!({"command": "sleep 5", "timeout_secs": 60}), &ctx)
            .await;

        assert_eq!(result.error().unwrap().code, "TIMEOUT");
    }

    #[tokio::test]
    async fn test_run_command_missing_command() {
        let (_dir, ctx, tool) = setup(ExecutionParams::default());
        let result = tool.handle(json!({"args": ["x"]}), &ctx).await;
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
