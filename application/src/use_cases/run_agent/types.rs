//! Type definitions for the RunAgent use case.

use crate::ports::llm_gateway::GatewayError;
use board_domain::TokenUsage;
use thiserror::Error;

/// Ways the run loop can stop short of a model-reported outcome.
///
/// These never escape the runner; they are folded into the run result.
#[derive(Error, Debug)]
pub enum RunAgentError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Run exceeded its duration budget")]
    Timeout,

    #[error("Exceeded maximum tool turns ({0})")]
    MaxToolTurnsExceeded(usize),

    #[error("Agent loop panicked: {0}")]
    Panicked(String),
}

/// Counters accrued while the loop runs; survive an aborted loop.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct RunProgress {
    pub tokens: TokenUsage,
    pub model_turns: usize,
    pub tool_calls: usize,
}
