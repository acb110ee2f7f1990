//! Worker wire format.
//!
//! The parent writes one [`RunRequest`] as JSON to the worker's stdin and
//! closes it; the worker answers with one [`AgentRunResult`] JSON line on
//! stdout. Anything else the worker has to say goes to stderr.

use board_application::context::{Workspace, WorkspaceInfo};
use board_application::ports::agent_runner::AgentRunParams;
use board_application::ports::workspace_executor::WorkspaceExecutor;
use board_domain::AgentRunResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Error, Debug)]
pub enum WireError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// [`AgentRunParams`] minus the live executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub project_id: String,
    #[serde(default)]
    pub ticket_id: Option<String>,
    pub profile: String,
    pub task: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub workflow: String,
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
    pub max_duration_ms: u64,
}

impl RunRequest {
    pub fn from_params(params: &AgentRunParams) -> Self {
        Self {
            project_id: params.project_id.clone(),
            ticket_id: params.ticket_id.clone(),
            profile: params.profile.clone(),
            task: params.task.clone(),
            system_prompt: params.system_prompt.clone(),
            workflow: params.workflow.clone(),
            workspace: params.workspace.info.clone(),
            session_dir: params.session_dir.clone(),
            max_duration_ms: u64::try_from(params.max_duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Rebuild run parameters around an executor for `workspace.root_path`.
    pub fn into_params(self, executor: Arc<dyn WorkspaceExecutor>) -> AgentRunParams {
        AgentRunParams {
            project_id: self.project_id,
            ticket_id: self.ticket_id,
            profile: self.profile,
            task: self.task,
            system_prompt: self.system_prompt,
            workflow: self.workflow,
            workspace: Workspace::new(self.workspace, executor),
            session_dir: self.session_dir,
            max_duration: Duration::from_millis(self.max_duration_ms),
        }
    }
}

/// Read a whole request from `input` (until EOF).
pub async fn read_request<R: AsyncRead + Unpin>(input: &mut R) -> Result<RunRequest, WireError> {
    let mut buf = String::new();
    input.read_to_string(&mut buf).await?;
    Ok(serde_json::from_str(&buf)?)
}

/// Write a result as a single JSON line.
pub async fn write_result<W: AsyncWrite + Unpin>(
    output: &mut W,
    result: &AgentRunResult,
) -> Result<(), WireError> {
    let mut line = serde_json::to_vec(result)?;
    line.push(b'\n');
    output.write_all(&line).await?;
    output.flush().await?;
    Ok(())
}

/// The result is the last non-empty stdout line.
pub fn parse_result(stdout: &str) -> Result<AgentRunResult, WireError> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");
    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::LocalWorkspaceExecutor;
    use board_domain::{RunComment, RunStatus, TicketState, TokenUsage};

    fn params() -> AgentRunParams {
        let info = WorkspaceInfo::new("/work/checkout")
            .with_branch("feature/login")
            .with_persona("dev-1");
        AgentRunParams {
            project_id: "P-1".to_string(),
            ticket_id: Some("T-1".to_string()),
            profile: "developer".to_string(),
            task: "Implement login".to_string(),
            system_prompt: "You are a developer.".to_string(),
            workflow: String::new(),
            workspace: Workspace::new(
                info,
                Arc::new(LocalWorkspaceExecutor::new("/work/checkout")),
            ),
            session_dir: Some(PathBuf::from("/tmp/session")),
            max_duration: Duration::from_secs(90),
        }
    }

    #[tokio::test]
    async fn test_request_survives_the_pipe() {
        let request = RunRequest::from_params(&params());
        let bytes = serde_json::to_vec(&request).unwrap();

        let decoded = read_request(&mut bytes.as_slice()).await.unwrap();
        let rebuilt = decoded.into_params(Arc::new(LocalWorkspaceExecutor::new("/work/checkout")));

        assert_eq!(rebuilt.workspace.info.branch, "feature/login");
        assert_eq!(rebuilt.workspace.info.persona_id.as_deref(), Some("dev-1"));
        assert_eq!(rebuilt.max_duration, Duration::from_secs(90));
        assert_eq!(rebuilt.ticket_id.as_deref(), Some("T-1"));
    }

    #[tokio::test]
    async fn test_result_is_last_line() {
        let result = AgentRunResult {
            status: RunStatus::Completed,
            comments: vec![RunComment::completion("done")],
            ticket_state_change: Some(TicketState::Verification),
            tokens_used: TokenUsage::new(10, 5),
            error: None,
            duration_ms: 42,
        };

        let mut out = b"stray output\n".to_vec();
        write_result(&mut out, &result).await.unwrap();

        let parsed = parse_result(&String::from_utf8(out).unwrap()).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_oversized_duration_saturates() {
        let mut params = params();
        params.max_duration = Duration::from_secs(u64::MAX);
        assert_eq!(RunRequest::from_params(&params).max_duration_ms, u64::MAX);
    }

    #[test]
    fn test_empty_output_is_malformed() {
        assert!(matches!(parse_result(""), Err(WireError::Malformed(_))));
    }
}
