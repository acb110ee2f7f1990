//! Execution parameters: run loop control.
//!
//! [`ExecutionParams`] groups the static knobs of the tool-use loop in
//! [`RunAgentUseCase`](crate::use_cases::run_agent::RunAgentUseCase) and the
//! command timeouts the workspace tools apply. The per-run duration budget is
//! not here; it travels with each run's parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum model turns that request tools before the run is failed.
    pub max_tool_turns: usize,
    /// Timeout for a command when the call does not ask for one.
    pub command_timeout: Duration,
    /// Upper bound on any command timeout a call may request.
    pub max_command_timeout: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_tool_turns: 40,
            command_timeout: Duration::from_secs(120),
            max_command_timeout: Duration::from_secs(600),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_tool_turns(mut self, max: usize) -> Self {
        self.max_tool_turns = max;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_max_command_timeout(mut self, timeout: Duration) -> Self {
        self.max_command_timeout = timeout;
        self
    }

    /// Timeout for one command: the requested seconds if any, capped.
    pub fn command_timeout_for(&self, requested_secs: Option<u64>) -> Duration {
        requested_secs
            .map(Duration::from_secs)
            .unwrap_or(self.command_timeout)
            .min(self.max_command_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_tool_turns, 40);
        assert_eq!(params.command_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_tool_turns(5)
            .with_command_timeout(Duration::from_secs(10));
        assert_eq!(params.max_tool_turns, 5);
        assert_eq!(params.command_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_command_timeout_is_capped() {
        let params = ExecutionParams::default()
            .with_command_timeout(Duration::from_secs(30))
            .with_max_command_timeout(Duration::from_secs(60));
        assert_eq!(params.command_timeout_for(None), Duration::from_secs(30));
        assert_eq!(params.command_timeout_for(Some(45)), Duration::from_secs(45));
        assert_eq!(params.command_timeout_for(Some(3600)), Duration::from_secs(60));
    }
}
