//! Domain error types

use crate::ticket::state::TicketState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid ticket state transition: {from} -> {to}")]
    InvalidTransition { from: TicketState, to: TicketState },

    #[error("Unknown ticket state: {0}")]
    UnknownState(String),

    #[error("Invalid transition table: {0}")]
    InvalidTransitionTable(String),

    #[error("Unknown run status: {0}")]
    UnknownRunStatus(String),
}

impl DomainError {
    /// Check if this error is a rejected lifecycle transition
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
