//! Database Operations port
//!
//! The board (tickets, comments, personas, documents) is owned elsewhere.
//! This core reads tickets and requests guarded changes through this port.

use async_trait::async_trait;
use board_domain::{Comment, Document, DocumentType, Persona, Ticket, TicketState, ToolError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseError {
    /// Carries the bare ticket id
    #[error("Ticket not found: {0}")]
    NotFound(String),

    /// The ticket was not in the state the caller validated against
    #[error("Ticket {ticket_id} is in state {actual}, expected {expected}")]
    StateConflict {
        ticket_id: String,
        expected: TicketState,
        actual: TicketState,
    },

    #[error("Database backend error: {0}")]
    Backend(String),
}

impl From<DatabaseError> for ToolError {
    fn from(err: DatabaseError) -> Self {
        match &err {
            DatabaseError::NotFound(_) => ToolError::new(ToolError::NOT_FOUND, err.to_string()),
            DatabaseError::StateConflict { .. } => ToolError::invalid_transition(err.to_string()),
            DatabaseError::Backend(_) => ToolError::execution_failed(err.to_string()),
        }
    }
}

/// A document to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub ticket_id: String,
    pub doc_type: DocumentType,
    pub content: String,
    pub author_persona_id: String,
}

/// Port for board persistence.
#[async_trait]
pub trait DatabaseOperations: Send + Sync {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, DatabaseError>;

    /// Atomically move a ticket from `expected` to `new`.
    ///
    /// Check-and-commit is one logical operation: of two racing requests
    /// from the same source state, at most one succeeds; the other gets
    /// [`DatabaseError::StateConflict`]. Callers validate the edge against
    /// the lifecycle table first.
    async fn update_ticket_state(
        &self,
        id: &str,
        expected: TicketState,
        new: TicketState,
    ) -> Result<Ticket, DatabaseError>;

    async fn create_comment(
        &self,
        ticket_id: &str,
        persona_id: &str,
        content: &str,
    ) -> Result<Comment, DatabaseError>;

    async fn get_persona(&self, id: &str) -> Result<Option<Persona>, DatabaseError>;

    async fn save_document(&self, document: NewDocument) -> Result<Document, DatabaseError>;
}
