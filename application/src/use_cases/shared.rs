//! Shared utilities for use cases.
//!
//! Deadline handling for the agent loop: model calls are bounded by the
//! remaining budget, tool calls are not, and the budget is re-checked
//! between tool calls.

use crate::ports::llm_gateway::GatewayError;
use crate::use_cases::run_agent::RunAgentError;
use board_domain::MAX_RUN_DURATION;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// `start + budget`, with the budget clamped to [`MAX_RUN_DURATION`].
pub(crate) fn deadline_after(start: Instant, budget: Duration) -> Instant {
    let budget = budget.min(MAX_RUN_DURATION);
    start
        .checked_add(budget)
        .or_else(|| start.checked_add(Duration::from_secs(24 * 60 * 60)))
        .unwrap_or(start)
}

/// Fail with [`RunAgentError::Timeout`] once the deadline has passed.
pub(crate) fn check_deadline(deadline: Instant) -> Result<(), RunAgentError> {
    if Instant::now() >= deadline {
        return Err(RunAgentError::Timeout);
    }
    Ok(())
}

/// Await a gateway call, giving up when the deadline passes.
pub(crate) async fn with_deadline<T, F>(deadline: Instant, call: F) -> Result<T, RunAgentError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    check_deadline(deadline)?;
    match tokio::time::timeout_at(deadline, call).await {
        Ok(result) => result.map_err(RunAgentError::Gateway),
        Err(_) => Err(RunAgentError::Timeout),
    }
}
