//! Ticket State Machine service
//!
//! The only path by which this core changes a ticket's state. Validation
//! happens before any write; the write itself is a compare-and-set so two
//! racing requests from the same source state cannot both succeed.

use crate::ports::database::{DatabaseError, DatabaseOperations};
use board_domain::{DomainError, Ticket, TicketState, ToolError, TransitionTable};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// Another writer moved the ticket between our read and our write
    #[error("Ticket {ticket_id} changed concurrently: expected {expected}, found {actual}")]
    Conflict {
        ticket_id: String,
        expected: TicketState,
        actual: TicketState,
    },

    #[error("Database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for TransitionError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(id) => TransitionError::TicketNotFound(id),
            DatabaseError::StateConflict {
                ticket_id,
                expected,
                actual,
            } => TransitionError::Conflict {
                ticket_id,
                expected,
                actual,
            },
            other => TransitionError::Database(other),
        }
    }
}

impl From<TransitionError> for ToolError {
    fn from(err: TransitionError) -> Self {
        match &err {
            TransitionError::TicketNotFound(_) => {
                ToolError::new(ToolError::NOT_FOUND, err.to_string())
            }
            TransitionError::Invalid(_) | TransitionError::Conflict { .. } => {
                ToolError::invalid_transition(err.to_string())
            }
            TransitionError::Database(_) => ToolError::execution_failed(err.to_string()),
        }
    }
}

/// Guarded lifecycle transitions over a [`TransitionTable`].
#[derive(Debug, Clone, Default)]
pub struct TicketStateMachine {
    table: TransitionTable,
}

impl TicketStateMachine {
    pub fn new(table: TransitionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn is_valid_transition(&self, from: TicketState, to: TicketState) -> bool {
        self.table.is_valid_transition(from, to)
    }

    /// Read the ticket, guard `current -> to`, then commit with compare-and-set.
    pub async fn transition(
        &self,
        db: &dyn DatabaseOperations,
        ticket_id: &str,
        to: TicketState,
    ) -> Result<Ticket, TransitionError> {
        let ticket = db
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| TransitionError::TicketNotFound(ticket_id.to_string()))?;

        let from = ticket.state;
        if let Err(err) = self.table.check(from, to) {
            warn!(ticket_id, %from, %to, "Rejected ticket transition");
            return Err(err.into());
        }

        debug!(ticket_id, %from, %to, "Committing ticket transition");
        let updated = db.update_ticket_state(ticket_id, from, to).await?;
        info!(ticket_id, %from, %to, "Ticket transitioned");
        Ok(updated)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingDb;
    use super::*;

    fn ticket(state: TicketState) -> Ticket {
        Ticket::new("T-1", "P-1", "Add login").with_state(state)
    }

    #[tokio::test]
    async fn test_valid_lifecycle_walk() {
        let db = RecordingDb::with_ticket(ticket(TicketState::Backlog));
        let machine = TicketStateMachine::default();

        for to in [
            TicketState::Research,
            TicketState::PlanApproval,
            TicketState::InProgress,
            TicketState::Verification,
            TicketState::Done,
        ] {
            let updated = machine.transition(&db, "T-1", to).await.unwrap();
            assert_eq!(updated.state, to);
        }

        let err = machine
            .transition(&db, "T-1", TicketState::Backlog)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            TransitionError::Invalid(DomainError::InvalidTransition {
                from: TicketState::Done,
                to: TicketState::Backlog
            })
        );
        assert_eq!(db.state_of("T-1"), Some(TicketState::Done));
    }

    #[tokio::test]
    async fn test_invalid_transition_rejected_before_write() {
        let db = RecordingDb::with_ticket(ticket(TicketState::Backlog));
        let machine = TicketStateMachine::default();

        let err = machine
            .transition(&db, "T-1", TicketState::Done)
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("backlog"));
        assert!(message.contains("done"));
        assert!(db.state_writes.lock().unwrap().is_empty());

        let tool_error: ToolError = err.into();
        assert_eq!(tool_error.code, ToolError::INVALID_TRANSITION);
    }

    #[tokio::test]
    async fn test_missing_ticket() {
        let db = RecordingDb::default();
        let err = TicketStateMachine::default()
            .transition(&db, "T-404", TicketState::Research)
            .await
            .unwrap_err();
        assert_eq!(err, TransitionError::TicketNotFound("T-404".to_string()));
    }

    #[tokio::test]
    async fn test_custom_table() {
        let table =
            TransitionTable::from_edges([(TicketState::Backlog, vec![TicketState::InProgress])])
                .unwrap();
        let machine = TicketStateMachine::new(table);
        let db = RecordingDb::with_ticket(ticket(TicketState::Backlog));

        assert!(machine
            .transition(&db, "T-1", TicketState::InProgress)
            .await
            .is_ok());
        assert!(machine
            .transition(&db, "T-1", TicketState::Verification)
            .await
            .is_err());
    }

    #[test]
    fn test_conflict_maps_from_database_error() {
        let err: TransitionError = DatabaseError::StateConflict {
            ticket_id: "T-1".to_string(),
            expected: TicketState::Research,
            actual: TicketState::Backlog,
        }
        .into();
        assert!(matches!(err, TransitionError::Conflict { .. }));
    }
}
