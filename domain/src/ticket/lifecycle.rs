//! Ticket lifecycle transition table
//!
//! The table is **total**: every [`TicketState`] has an entry, possibly
//! empty. An empty entry means "no transitions allowed", so a terminal
//! state can never be left and the guard never falls through to a default.
//!
//! ```text
//! backlog ──▶ research ──▶ plan_approval ──▶ in_progress ──▶ verification ──▶ done
//!    ▲           │ ▲             │               │ ▲             │
//!    └───────────┘ └─────────────┘               │ └─────────────┘
//!                  └─────────────────────────────┘
//! ```
//!
//! Backward edges are the rework paths: research can be sent back to the
//! backlog, a rejected plan returns to research, implementation can reopen
//! research, and failed verification returns to implementation.

use super::state::TicketState;
use crate::core::error::DomainError;
use std::collections::BTreeMap;

/// Directed adjacency table of guarded lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    edges: BTreeMap<TicketState, Vec<TicketState>>,
}

impl TransitionTable {
    /// Build a table from explicit edges.
    ///
    /// States without an entry get an empty one. Duplicate targets are
    /// collapsed, keeping the first occurrence. Self-loops are rejected.
    pub fn from_edges(
        edges: impl IntoIterator<Item = (TicketState, Vec<TicketState>)>,
    ) -> Result<Self, DomainError> {
        let mut table: BTreeMap<TicketState, Vec<TicketState>> =
            TicketState::ALL.iter().map(|s| (*s, Vec::new())).collect();

        for (from, targets) in edges {
            let entry = table.entry(from).or_default();
            for to in targets {
                if to == from {
                    return Err(DomainError::InvalidTransitionTable(format!(
                        "self-loop on '{}'",
                        from
                    )));
                }
                if !entry.contains(&to) {
                    entry.push(to);
                }
            }
        }

        Ok(Self { edges: table })
    }

    /// States reachable from `from` by one guarded transition.
    pub fn targets(&self, from: TicketState) -> &[TicketState] {
        self.edges.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` iff `to` appears in `from`'s adjacency entry.
    pub fn is_valid_transition(&self, from: TicketState, to: TicketState) -> bool {
        self.targets(from).contains(&to)
    }

    /// Guard form of [`is_valid_transition`](Self::is_valid_transition).
    pub fn check(&self, from: TicketState, to: TicketState) -> Result<(), DomainError> {
        if self.is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition { from, to })
        }
    }

    /// A state with no outgoing edges.
    pub fn is_terminal(&self, state: TicketState) -> bool {
        self.targets(state).is_empty()
    }

    /// Iterate entries in lifecycle order.
    pub fn entries(&self) -> impl Iterator<Item = (TicketState, &[TicketState])> {
        self.edges.iter().map(|(from, to)| (*from, to.as_slice()))
    }
}

impl Default for TransitionTable {
    /// The canonical six-stage lifecycle.
    fn default() -> Self {
        use TicketState::*;
        let edges = BTreeMap::from([
            (Backlog, vec![Research]),
            (Research, vec![PlanApproval, Backlog]),
            (PlanApproval, vec![InProgress, Research]),
            (InProgress, vec![Verification, Research]),
            (Verification, vec![Done, InProgress]),
            (Done, vec![]),
        ]);
        Self { edges }
    }
}
