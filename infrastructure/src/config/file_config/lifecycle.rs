//! Ticket lifecycle override (`[lifecycle]` section)

use board_domain::{ConfigIssue, ConfigIssueCode, TicketState, TransitionTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw lifecycle configuration from TOML
///
/// Absent means the canonical six-stage table. When present, the listed
/// edges replace it entirely; states left out have no outgoing edges.
///
/// ```toml
/// [lifecycle.transitions]
/// backlog = ["research"]
/// research = ["in_progress"]
/// in_progress = ["done"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLifecycleConfig {
    pub transitions: Option<BTreeMap<String, Vec<String>>>,
}

impl FileLifecycleConfig {
    /// Parse the override, falling back to the canonical table on any error.
    pub fn to_transition_table(&self) -> (TransitionTable, Vec<ConfigIssue>) {
        let Some(transitions) = &self.transitions else {
            return (TransitionTable::default(), Vec::new());
        };

        let mut issues = Vec::new();
        let parse = |name: &str, issues: &mut Vec<ConfigIssue>| match name.parse::<TicketState>() {
            Ok(state) => Some(state),
            Err(_) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownState,
                    format!(
                        "lifecycle.transitions: unknown state '{}' (valid: {})",
                        name,
                        TicketState::names().join(", ")
                    ),
                ));
                None
            }
        };

        let mut edges = Vec::new();
        for (from, targets) in transitions {
            let Some(from) = parse(from, &mut issues) else {
                continue;
            };
            let targets: Vec<TicketState> = targets
                .iter()
                .filter_map(|t| parse(t, &mut issues))
                .collect();
            edges.push((from, targets));
        }

        if !issues.is_empty() {
            return (TransitionTable::default(), issues);
        }

        match TransitionTable::from_edges(edges) {
            Ok(table) => (table, issues),
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidTransitionTable,
                    format!("lifecycle.transitions: {}", e),
                ));
                (TransitionTable::default(), issues)
            }
        }
    }
}
