//! Agent Runner port
//!
//! Callers depend only on `run(params) -> result`. Whether the loop runs
//! in-process or in a child process is an implementation detail.

use crate::context::Workspace;
use async_trait::async_trait;
use board_domain::AgentRunResult;
use std::path::PathBuf;
use std::time::Duration;

/// Everything a runner needs for one run.
#[derive(Debug, Clone)]
pub struct AgentRunParams {
    pub project_id: String,
    pub ticket_id: Option<String>,
    /// Profile (role) whose tool allowlist the run is confined to
    pub profile: String,
    pub task: String,
    /// Role prompt, opaque to the runner
    pub system_prompt: String,
    pub workflow: String,
    pub workspace: Workspace,
    /// Directory for run artifacts and the transcript
    pub session_dir: Option<PathBuf>,
    pub max_duration: Duration,
}

/// Drives one run to completion.
///
/// Never fails: every outcome, including timeouts and internal faults, is
/// reported through [`AgentRunResult::status`].
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(&self, params: AgentRunParams) -> AgentRunResult;
}
