//! Apply Run Result use case
//!
//! Commits what a finished run asked for: its comments, in order, then its
//! requested state change through the lifecycle guard. A timeout or error
//! result never changes state.

use crate::ports::database::{DatabaseError, DatabaseOperations};
use crate::use_cases::transition_ticket::TicketStateMachine;
use board_domain::{AgentRunResult, Ticket};
use std::sync::Arc;
use tracing::{info, warn};

/// What was committed.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRunResult {
    pub comments_posted: usize,
    /// `None` when no transition was requested or allowed to be attempted
    pub transition: Option<Result<Ticket, String>>,
}

pub struct ApplyRunResultUseCase {
    db: Arc<dyn DatabaseOperations>,
    state_machine: TicketStateMachine,
}

impl ApplyRunResultUseCase {
    pub fn new(db: Arc<dyn DatabaseOperations>, state_machine: TicketStateMachine) -> Self {
        Self { db, state_machine }
    }

    /// Post comments, then attempt the guarded transition.
    ///
    /// A comment write failure stops before any transition is attempted.
    /// A rejected transition is reported in the result, not as an error.
    pub async fn apply(
        &self,
        ticket_id: &str,
        persona_id: &str,
        result: &AgentRunResult,
    ) -> Result<AppliedRunResult, DatabaseError> {
        let mut comments_posted = 0;
        for comment in &result.comments {
            self.db
                .create_comment(ticket_id, persona_id, &comment.tagged())
                .await?;
            comments_posted += 1;
        }

        let transition = match result.ticket_state_change {
            Some(to) if result.status.may_change_state() => {
                let outcome = self
                    .state_machine
                    .transition(self.db.as_ref(), ticket_id, to)
                    .await
                    .map_err(|e| e.to_string());
                if let Err(e) = &outcome {
                    warn!(ticket_id, %to, "Requested transition not applied: {}", e);
                }
                Some(outcome)
            }
            Some(to) => {
                warn!(ticket_id, %to, status = %result.status, "Ignoring state change on unsuccessful run");
                None
            }
            None => None,
        };

        info!(ticket_id, comments_posted, "Run result applied");
        Ok(AppliedRunResult {
            comments_posted,
            transition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::transition_ticket::test_support::RecordingDb;
    use board_domain::{RunComment, RunStatus, TicketState, TokenUsage};

    fn result(status: RunStatus, change: Option<TicketState>) -> AgentRunResult {
        AgentRunResult {
            status,
            comments: vec![
                RunComment::status("Tests pass"),
                RunComment::completion("Feature done"),
            ],
            ticket_state_change: change,
            tokens_used: TokenUsage::default(),
            error: None,
            duration_ms: 10,
        }
    }

    fn setup(state: TicketState) -> (Arc<RecordingDb>, ApplyRunResultUseCase) {
        let db = Arc::new(RecordingDb::with_ticket(
            Ticket::new("T-1", "P-1", "Feature").with_state(state),
        ));
        let use_case = ApplyRunResultUseCase::new(db.clone(), TicketStateMachine::default());
        (db, use_case)
    }

    #[tokio::test]
    async fn test_posts_comments_in_order_then_transitions() {
        let (db, use_case) = setup(TicketState::InProgress);

        let applied = use_case
            .apply(
                "T-1",
                "dev-1",
                &result(RunStatus::Completed, Some(TicketState::Verification)),
            )
            .await
            .unwrap();

        assert_eq!(applied.comments_posted, 2);
        let comments = db.comments.lock().unwrap().clone();
        assert_eq!(comments[0].2, "[status] Tests pass");
        assert_eq!(comments[1].2, "[completion] Feature done");
        assert_eq!(comments[0].1, "dev-1");
        assert!(matches!(applied.transition, Some(Ok(_))));
        assert_eq!(db.state_of("T-1"), Some(TicketState::Verification));
    }

    #[tokio::test]
    async fn test_invalid_requested_state_is_reported_not_applied() {
        let (db, use_case) = setup(TicketState::Backlog);

        let applied = use_case
            .apply("T-1", "dev-1", &result(RunStatus::Completed, Some(TicketState::Done)))
            .await
            .unwrap();

        match applied.transition {
            Some(Err(message)) => assert!(message.contains("backlog -> done")),
            other => panic!("expected rejected transition, got {:?}", other),
        }
        assert_eq!(db.state_of("T-1"), Some(TicketState::Backlog));
    }

    #[tokio::test]
    async fn test_timeout_never_changes_state() {
        let (db, use_case) = setup(TicketState::InProgress);

        let applied = use_case
            .apply(
                "T-1",
                "dev-1",
                &result(RunStatus::Timeout, Some(TicketState::Verification)),
            )
            .await
            .unwrap();

        assert!(applied.transition.is_none());
        assert_eq!(db.state_of("T-1"), Some(TicketState::InProgress));
        assert!(db.state_writes.lock().unwrap().is_empty());
    }
}
