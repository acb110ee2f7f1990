//! In-memory board store.
//!
//! All maps sit behind one `RwLock`, so the state compare-and-set in
//! [`update_ticket_state`](DatabaseOperations::update_ticket_state) is a
//! single critical section: two racing writers from the same source state
//! cannot both win.

use async_trait::async_trait;
use board_application::ports::database::{DatabaseError, DatabaseOperations, NewDocument};
use board_domain::{Comment, Document, Persona, Ticket, TicketState};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Serializable image of a whole board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub personas: Vec<Persona>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Default)]
struct Board {
    tickets: BTreeMap<String, Ticket>,
    personas: BTreeMap<String, Persona>,
    comments: Vec<Comment>,
    documents: Vec<Document>,
}

impl Board {
    fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            tickets: snapshot
                .tickets
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            personas: snapshot
                .personas
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            comments: snapshot.comments,
            documents: snapshot.documents,
        }
    }

    fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tickets: self.tickets.values().cloned().collect(),
            personas: self.personas.values().cloned().collect(),
            comments: self.comments.clone(),
            documents: self.documents.clone(),
        }
    }

    fn require_ticket(&self, id: &str) -> Result<&Ticket, DatabaseError> {
        self.tickets
            .get(id)
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    board: RwLock<Board>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            board: RwLock::new(Board::from_snapshot(snapshot)),
        }
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        self.board.read().await.snapshot()
    }

    /// Replace the whole board.
    pub async fn restore(&self, snapshot: BoardSnapshot) {
        *self.board.write().await = Board::from_snapshot(snapshot);
    }

    /// Seed or replace a ticket, bypassing the lifecycle guard.
    pub async fn insert_ticket(&self, ticket: Ticket) {
        self.board
            .write()
            .await
            .tickets
            .insert(ticket.id.clone(), ticket);
    }

    pub async fn insert_persona(&self, persona: Persona) {
        self.board
            .write()
            .await
            .personas
            .insert(persona.id.clone(), persona);
    }

    /// Comments on a ticket, oldest first
    pub async fn comments_for(&self, ticket_id: &str) -> Vec<Comment> {
        self.board
            .read()
            .await
            .comments
            .iter()
            .filter(|c| c.ticket_id == ticket_id)
            .cloned()
            .collect()
    }

    pub async fn documents_for(&self, ticket_id: &str) -> Vec<Document> {
        self.board
            .read()
            .await
            .documents
            .iter()
            .filter(|d| d.ticket_id == ticket_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DatabaseOperations for InMemoryDatabase {
    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, DatabaseError> {
        Ok(self.board.read().await.tickets.get(id).cloned())
    }

    async fn update_ticket_state(
        &self,
        id: &str,
        expected: TicketState,
        new: TicketState,
    ) -> Result<Ticket, DatabaseError> {
        let mut board = self.board.write().await;
        let ticket = board
            .tickets
            .get_mut(id)
            .ok_or_else(|| DatabaseError::NotFound(id.to_string()))?;

        if ticket.state != expected {
            return Err(DatabaseError::StateConflict {
                ticket_id: id.to_string(),
                expected,
                actual: ticket.state,
            });
        }

        ticket.state = new;
        ticket.updated_at = Utc::now();
        Ok(ticket.clone())
    }

    async fn create_comment(
        &self,
        ticket_id: &str,
        persona_id: &str,
        content: &str,
    ) -> Result<Comment, DatabaseError> {
        let mut board = self.board.write().await;
        board.require_ticket(ticket_id)?;

        let comment = Comment {
            id: format!("C-{}", board.comments.len() + 1),
            ticket_id: ticket_id.to_string(),
            persona_id: persona_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        board.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_persona(&self, id: &str) -> Result<Option<Persona>, DatabaseError> {
        Ok(self.board.read().await.personas.get(id).cloned())
    }

    async fn save_document(&self, document: NewDocument) -> Result<Document, DatabaseError> {
        let mut board = self.board.write().await;
        board.require_ticket(&document.ticket_id)?;

        let saved = Document {
            id: format!("D-{}", board.documents.len() + 1),
            ticket_id: document.ticket_id,
            doc_type: document.doc_type,
            content: document.content,
            author_persona_id: document.author_persona_id,
            created_at: Utc::now(),
        };
        board.documents.push(saved.clone());
        Ok(saved)
    }
}
