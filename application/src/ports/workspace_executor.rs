//! Workspace Executor port
//!
//! File I/O and command execution against one project checkout. Tools never
//! touch the host directly; everything goes through this port.

use async_trait::async_trait;
use board_domain::ToolError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Path escapes the workspace: {0}")]
    OutsideWorkspace(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Command timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Failed to spawn command: {0}")]
    Spawn(String),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),
}

impl From<WorkspaceError> for ToolError {
    fn from(err: WorkspaceError) -> Self {
        let message = err.to_string();
        match err {
            WorkspaceError::NotFound(_) => ToolError::new(ToolError::NOT_FOUND, message),
            WorkspaceError::OutsideWorkspace(_) => {
                ToolError::new(ToolError::PERMISSION_DENIED, message)
            }
            WorkspaceError::Timeout(_) => ToolError::new(ToolError::TIMEOUT, message),
            WorkspaceError::InvalidPattern(_) => ToolError::invalid_argument(message),
            WorkspaceError::Io(_) | WorkspaceError::Spawn(_) => ToolError::execution_failed(message),
        }
    }
}

/// Options for a single command execution.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Working directory relative to the workspace root (root when `None`)
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
}

impl RunOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { cwd: None, timeout }
    }

    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr, whichever are non-empty.
    pub fn combined(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", "") => String::new(),
            (out, "") => out.to_string(),
            ("", err) => err.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// Port for workspace operations.
#[async_trait]
pub trait WorkspaceExecutor: Send + Sync {
    /// Absolute root of the checkout
    fn root(&self) -> &Path;

    /// Run `command` with `args`. A non-zero exit is an `Ok` with that code.
    async fn run(
        &self,
        command: &str,
        args: &[String],
        options: RunOptions,
    ) -> Result<CommandOutput, WorkspaceError>;

    async fn read_file(&self, path: &str) -> Result<String, WorkspaceError>;

    async fn write_file(&self, path: &str, content: &str) -> Result<(), WorkspaceError>;

    /// Root-relative paths matching `pattern`, sorted.
    async fn list_files(&self, pattern: &str) -> Result<Vec<String>, WorkspaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_output() {
        let output = CommandOutput {
            stdout: "ok\n".to_string(),
            stderr: "warning: unused\n".to_string(),
            exit_code: 0,
        };
        assert_eq!(output.combined(), "ok\nwarning: unused");
        assert!(output.success());
        assert_eq!(CommandOutput::default().combined(), "");
    }

    #[test]
    fn test_workspace_error_to_tool_error() {
        let err: ToolError = WorkspaceError::OutsideWorkspace("../etc".into()).into();
        assert_eq!(err.code, ToolError::PERMISSION_DENIED);

        let err: ToolError = WorkspaceError::NotFound("a.txt".into()).into();
        assert_eq!(err.code, ToolError::NOT_FOUND);
        assert!(err.message.contains("a.txt"));

        let err: ToolError = WorkspaceError::Timeout(Duration::from_secs(5)).into();
        assert_eq!(err.code, ToolError::TIMEOUT);
    }
}
