//! File operation tools: read_file, write_file, edit_file, list_files
//!
//! All paths are workspace-relative and go through the context's
//! [`WorkspaceExecutor`](board_application::WorkspaceExecutor); nothing here
//! touches `std::fs` directly.

use board_application::context::{ExecutionContext, parse_params};
use board_domain::core::string::count_occurrences;
use board_domain::{FieldKind, ObjectSchema, ToolDefinition, ToolError, ToolResult};
use serde::Deserialize;
use serde_json::Value;

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const EDIT_FILE: &str = "edit_file";
pub const LIST_FILES: &str = "list_files";

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a file in the workspace",
        ObjectSchema::new()
            .required("path", FieldKind::String, "Workspace-relative path of the file")
            .optional(
                "offset",
                FieldKind::Integer,
                "Line number to start reading from (0-indexed)",
            )
            .optional("limit", FieldKind::Integer, "Maximum number of lines to read"),
    )
}

/// Get the tool definition for write_file
pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file in the workspace. Creates the file (and parent directories) if it doesn't exist, or overwrites if it does.",
        ObjectSchema::new()
            .required("path", FieldKind::String, "Workspace-relative path of the file")
            .required("content", FieldKind::String, "Full new content of the file"),
    )
}

/// Get the tool definition for edit_file
pub fn edit_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        EDIT_FILE,
        "Replace one exact occurrence of a string in a file. Fails if the string is absent or appears more than once; include more surrounding context to disambiguate.",
        ObjectSchema::new()
            .required("path", FieldKind::String, "Workspace-relative path of the file")
            .required("old_string", FieldKind::String, "Exact text to replace")
            .required("new_string", FieldKind::String, "Replacement text"),
    )
}

/// Get the tool definition for list_files
pub fn list_files_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_FILES,
        "List workspace files matching a glob pattern, e.g. 'src/**/*.rs'",
        ObjectSchema::new().required("pattern", FieldKind::String, "Glob pattern"),
    )
}

#[derive(Debug, Deserialize)]
struct ReadFileParams {
    path: String,
    offset: Option<usize>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WriteFileParams {
    path: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct EditFileParams {
    path: String,
    old_string: String,
    new_string: String,
}

#[derive(Debug, Deserialize)]
struct ListFilesParams {
    pattern: String,
}

/// Keep lines `[offset, offset + limit)`; no window returns the content as-is.
fn window_lines(content: String, offset: Option<usize>, limit: Option<usize>) -> String {
    if offset.is_none() && limit.is_none() {
        return content;
    }
    let offset = offset.unwrap_or(0);
    let lines: Vec<&str> = content.lines().collect();
    if offset >= lines.len() {
        return String::new();
    }
    let end = match limit {
        Some(l) => offset.saturating_add(l).min(lines.len()),
        None => lines.len(),
    };
    lines[offset..end].join("\n")
}

pub struct ReadFileTool {
    definition: ToolDefinition,
}

impl ReadFileTool {
    pub fn new() -> Self {
        Self {
            definition: read_file_definition(),
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: ReadFileParams = parse_params(&self.definition, &params)?;
        let content = ctx.executor().read_file(&params.path).await?;
        let output = window_lines(content, params.offset, params.limit);
        let bytes = output.len();

        Ok(ToolResult::success(READ_FILE, output)
            .with_bytes(bytes)
            .with_path(params.path))
    }
}

pub struct WriteFileTool {
    definition: ToolDefinition,
}

impl WriteFileTool {
    pub fn new() -> Self {
        Self {
            definition: write_file_definition(),
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: WriteFileParams = parse_params(&self.definition, &params)?;
        ctx.executor()
            .write_file(&params.path, &params.content)
            .await?;

        let bytes = params.content.len();
        Ok(ToolResult::success(
            WRITE_FILE,
            format!("Successfully wrote {} bytes to {}", bytes, params.path),
        )
        .with_bytes(bytes)
        .with_path(params.path))
    }
}

pub struct EditFileTool {
    definition: ToolDefinition,
}

impl EditFileTool {
    pub fn new() -> Self {
        Self {
            definition: edit_file_definition(),
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: EditFileParams = parse_params(&self.definition, &params)?;
        if params.old_string.is_empty() {
            return Err(ToolError::invalid_argument(
                "edit_file: old_string must not be empty",
            ));
        }

        let content = ctx.executor().read_file(&params.path).await?;
        match count_occurrences(&content, &params.old_string) {
            1 => {}
            0 => {
                return Err(ToolError::invalid_argument(format!(
                    "old_string not found in {} (0 occurrences)",
                    params.path
                )));
            }
            n => {
                return Err(ToolError::invalid_argument(format!(
                    "old_string is ambiguous in {}: found {} occurrences, expected exactly 1",
                    params.path, n
                )));
            }
        }

        let updated = content.replacen(&params.old_string, &params.new_string, 1);
        ctx.executor().write_file(&params.path, &updated).await?;

        Ok(
            ToolResult::success(EDIT_FILE, format!("Edited {}", params.path))
                .with_bytes(updated.len())
                .with_path(params.path),
        )
    }
}

pub struct ListFilesTool {
    definition: ToolDefinition,
}

impl ListFilesTool {
    pub fn new() -> Self {
        Self {
            definition: list_files_definition(),
        }
    }

    async fn execute(&self, params: Value, ctx: &ExecutionContext) -> Result<ToolResult, ToolError> {
        let params: ListFilesParams = parse_params(&self.definition, &params)?;
        let files = ctx.executor().list_files(&params.pattern).await?;
        let count = files.len();

        let output = if files.is_empty() {
            format!("No files match '{}'", params.pattern)
        } else {
            files.join("\n")
        };
        Ok(ToolResult::success(LIST_FILES, output).with_match_count(count))
    }
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WriteFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for EditFileTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ListFilesTool {
    fn default() -> Self {
        Self::new()
    }
}

impl_tool!(ReadFileTool, WriteFileTool, EditFileTool, ListFilesTool);
