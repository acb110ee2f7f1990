//! Tool domain value objects: immutable result and error types
//!
//! Every tool invocation produces a [`ToolResult`]. Failures are values,
//! never panics or `Err`s crossing the tool boundary, so the reasoning loop
//! can hand them straight back to the model.
//!
//! Error codes in [`ToolError`] tell the model whether retrying with
//! different arguments can help: `INVALID_ARGUMENT` and `NOT_FOUND` are
//! retryable, the rest need a different request altogether.

use serde::{Deserialize, Serialize};

/// Error that occurred during tool execution.
///
/// | Code | Retryable? | Description |
/// |------|-----------|-------------|
/// | `INVALID_ARGUMENT` | Yes | Missing/wrong parameters, the model can fix |
/// | `NOT_FOUND` | Yes | Unknown tool or resource |
/// | `PERMISSION_DENIED` | No | Tool outside the profile allowlist, path outside the workspace |
/// | `MISSING_CONTEXT` | No | Ticket id, persona id or database absent from the context |
/// | `EXECUTION_FAILED` | No | Collaborator failure (I/O error, backend error) |
/// | `TIMEOUT` | No | Operation timed out |
/// | `INVALID_TRANSITION` | No | Rejected by the lifecycle guard |
/// | `COMMAND_FAILED` | No | Command exited non-zero |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const PERMISSION_DENIED: &'static str = "PERMISSION_DENIED";
    pub const MISSING_CONTEXT: &'static str = "MISSING_CONTEXT";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const TIMEOUT: &'static str = "TIMEOUT";
    pub const INVALID_TRANSITION: &'static str = "INVALID_TRANSITION";
    pub const COMMAND_FAILED: &'static str = "COMMAND_FAILED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENT, message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            Self::NOT_FOUND,
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            Self::PERMISSION_DENIED,
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn missing_context(field: &str) -> Self {
        Self::new(
            Self::MISSING_CONTEXT,
            format!("Execution context has no {}", field),
        )
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            Self::TIMEOUT,
            format!("Operation timed out: {}", operation.into()),
        )
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_TRANSITION, message)
    }

    pub fn command_failed(exit_code: i32) -> Self {
        Self::new(
            Self::COMMAND_FAILED,
            format!("Command exited with code {}", exit_code),
        )
    }

    /// Whether the model can reasonably retry with corrected arguments.
    pub fn is_retryable(&self) -> bool {
        matches!(self.code.as_str(), Self::INVALID_ARGUMENT | Self::NOT_FOUND)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution.
///
/// `error` being set does not imply `output` is empty: a command that exits
/// non-zero still returns what it printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    #[serde(default)]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured side-channel data about a tool execution.
///
/// | Tool | `bytes` | `path` | `exit_code` | `match_count` |
/// |------|:---:|:---:|:---:|:---:|
/// | `read_file` / `write_file` / `edit_file` | yes | yes | - | - |
/// | `list_files` | - | - | - | yes |
/// | `run_command` / `git_*` | - | - | yes | - |
///
/// `duration_ms` is filled in by the registry for every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
    /// Tool-specific extras (ticket state, comment id, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            output: output.into(),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result with empty output
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            output: String::new(),
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result that still carries output
    pub fn partial(
        tool_name: impl Into<String>,
        output: impl Into<String>,
        error: ToolError,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            output: output.into(),
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.metadata.path = Some(path.into());
        self
    }

    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.metadata.bytes = Some(bytes);
        self
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.metadata.exit_code = Some(exit_code);
        self
    }

    pub fn with_match_count(mut self, count: usize) -> Self {
        self.metadata.match_count = Some(count);
        self
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.metadata.extra = Some(extra);
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Text handed back to the model: output, then the error if any.
    pub fn to_model_content(&self) -> String {
        match (&self.error, self.output.is_empty()) {
            (None, _) => self.output.clone(),
            (Some(err), true) => format!("Error: {}", err),
            (Some(err), false) => format!("{}\n\nError: {}", self.output, err),
        }
    }
}
