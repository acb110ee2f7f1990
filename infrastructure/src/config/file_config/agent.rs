//! Agent run configuration (`[agent]` section)

use board_domain::{ConfigIssue, ConfigIssueCode, MAX_RUN_DURATION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// max_duration_secs = 1800
/// max_tool_turns = 40
/// session_root = ".board/sessions"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Wall-clock budget for one run
    pub max_duration_secs: u64,
    /// Model turns that may request tools before the run is failed
    pub max_tool_turns: usize,
    /// Parent of per-run session directories (transcripts)
    pub session_root: Option<PathBuf>,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: 30 * 60,
            max_tool_turns: 40,
            session_root: None,
        }
    }
}

impl FileAgentConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_duration_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroLimit,
                "agent.max_duration_secs is 0; every run would time out immediately",
            ));
        } else if self.max_duration() > MAX_RUN_DURATION {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::LimitTooLarge,
                format!(
                    "agent.max_duration_secs = {} exceeds {}; runs are capped there",
                    self.max_duration_secs,
                    MAX_RUN_DURATION.as_secs()
                ),
            ));
        }
        if self.max_tool_turns == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroLimit,
                "agent.max_tool_turns is 0; no tool could ever be called",
            ));
        }
        issues
    }
}
