//! Local checkout executor.
//!
//! Every path an agent names is resolved against the workspace root and
//! rejected if it lexically escapes it. Symlinks inside the checkout are
//! followed as-is; this is an allowlist surface, not a sandbox.

use async_trait::async_trait;
use board_application::ports::workspace_executor::{
    CommandOutput, RunOptions, WorkspaceError, WorkspaceExecutor,
};
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub struct LocalWorkspaceExecutor {
    root: PathBuf,
}

impl LocalWorkspaceExecutor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `path` under the root without touching the filesystem.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, WorkspaceError> {
        let candidate = Path::new(path);
        let relative = if candidate.is_absolute() {
            candidate
                .strip_prefix(&self.root)
                .map_err(|_| WorkspaceError::OutsideWorkspace(path.to_string()))?
        } else {
            candidate
        };

        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(WorkspaceError::OutsideWorkspace(path.to_string()));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(WorkspaceError::OutsideWorkspace(path.to_string()));
                }
            }
        }
        Ok(resolved)
    }

    fn io_error(path: &str, err: std::io::Error) -> WorkspaceError {
        match err.kind() {
            std::io::ErrorKind::NotFound => WorkspaceError::NotFound(path.to_string()),
            _ => WorkspaceError::Io(format!("{}: {}", path, err)),
        }
    }
}

#[async_trait]
impl WorkspaceExecutor for LocalWorkspaceExecutor {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn run(
        &self,
        command: &str,
        args: &[String],
        options: RunOptions,
    ) -> Result<CommandOutput, WorkspaceError> {
        let cwd = match &options.cwd {
            Some(dir) => self.resolve(&dir.to_string_lossy())?,
            None => self.root.clone(),
        };

        debug!(command, ?args, cwd = %cwd.display(), timeout_secs = options.timeout.as_secs(), "Running command");

        let child = Command::new(command)
            .args(args)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WorkspaceError::Spawn(format!("{}: {}", command, e)))?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(options.timeout, child.wait_with_output())
            .await
            .map_err(|_| WorkspaceError::Timeout(options.timeout))?
            .map_err(|e| WorkspaceError::Io(format!("{}: {}", command, e)))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    async fn read_file(&self, path: &str) -> Result<String, WorkspaceError> {
        let full = self.resolve(path)?;
        if full.is_dir() {
            return Err(WorkspaceError::Io(format!("{} is a directory", path)));
        }
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| Self::io_error(path, e))
    }

    async fn write_file(&self, path: &str, content: &str) -> Result<(), WorkspaceError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::io_error(path, e))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| Self::io_error(path, e))
    }

    async fn list_files(&self, pattern: &str) -> Result<Vec<String>, WorkspaceError> {
        // Validate the literal prefix stays inside the root; glob metacharacters
        // never contain separators that could climb out.
        let full = self.resolve(pattern)?;
        let root = self.root.clone();
        let relative = full
            .strip_prefix(&root)
            .map_err(|_| WorkspaceError::OutsideWorkspace(pattern.to_string()))?;
        let full_pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            relative.to_string_lossy()
        );

        let paths = glob::glob(&full_pattern)
            .map_err(|e| WorkspaceError::InvalidPattern(format!("{}: {}", pattern, e)))?;

        let mut files: Vec<String> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .filter_map(|p| {
                p.strip_prefix(&root)
                    .ok()
                    .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}
