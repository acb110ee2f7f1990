//! Workspace execution limits (`[workspace]` section)

use board_application::ExecutionParams;
use board_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw workspace configuration from TOML
///
/// # Example
///
/// ```toml
/// [workspace]
/// command_timeout_secs = 120      # default for run_command and git tools
/// max_command_timeout_secs = 600  # hard cap on per-call overrides
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWorkspaceConfig {
    pub command_timeout_secs: u64,
    pub max_command_timeout_secs: u64,
}

impl Default for FileWorkspaceConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 120,
            max_command_timeout_secs: 600,
        }
    }
}

impl FileWorkspaceConfig {
    /// Execution limits, with the default clamped to the cap.
    pub fn execution_params(&self, max_tool_turns: usize) -> ExecutionParams {
        let cap = Duration::from_secs(self.max_command_timeout_secs);
        ExecutionParams::default()
            .with_max_tool_turns(max_tool_turns)
            .with_max_command_timeout(cap)
            .with_command_timeout(Duration::from_secs(self.command_timeout_secs).min(cap))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.command_timeout_secs == 0 || self.max_command_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroLimit,
                "workspace command timeouts must be greater than 0",
            ));
        }
        if self.command_timeout_secs > self.max_command_timeout_secs {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::TimeoutAboveCap,
                format!(
                    "workspace.command_timeout_secs ({}) exceeds max_command_timeout_secs ({}); it will be capped",
                    self.command_timeout_secs, self.max_command_timeout_secs
                ),
            ));
        }
        issues
    }
}
