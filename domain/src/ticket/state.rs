//! Ticket lifecycle stages

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle stage of a ticket.
///
/// Declaration order is the forward order of the lifecycle, which is also
/// the order used for listing and for `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    Backlog,
    Research,
    PlanApproval,
    InProgress,
    Verification,
    Done,
}

impl TicketState {
    /// Every state, in lifecycle order.
    pub const ALL: [TicketState; 6] = [
        TicketState::Backlog,
        TicketState::Research,
        TicketState::PlanApproval,
        TicketState::InProgress,
        TicketState::Verification,
        TicketState::Done,
    ];

    /// State a freshly created ticket starts in.
    pub fn initial() -> Self {
        TicketState::Backlog
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketState::Backlog => "backlog",
            TicketState::Research => "research",
            TicketState::PlanApproval => "plan_approval",
            TicketState::InProgress => "in_progress",
            TicketState::Verification => "verification",
            TicketState::Done => "done",
        }
    }

    /// All state names, for enum parameter schemas and error messages.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl std::fmt::Display for TicketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownState(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_state() {
        for state in TicketState::ALL {
            assert_eq!(state.as_str().parse::<TicketState>().unwrap(), state);
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_dashes() {
        assert_eq!(
            "Plan-Approval".parse::<TicketState>().unwrap(),
            TicketState::PlanApproval
        );
        assert_eq!(
            " IN_PROGRESS ".parse::<TicketState>().unwrap(),
            TicketState::InProgress
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "archived".parse::<TicketState>().unwrap_err();
        assert_eq!(err, DomainError::UnknownState("archived".to_string()));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&TicketState::PlanApproval).unwrap();
        assert_eq!(json, "\"plan_approval\"");
        let back: TicketState = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(back, TicketState::InProgress);
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(TicketState::initial(), TicketState::Backlog);
    }
}
