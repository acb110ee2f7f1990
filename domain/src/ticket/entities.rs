//! Board entities owned by the ticket database
//!
//! The orchestration core only reads these and requests guarded changes;
//! creation and deletion belong to whatever persists the board.

use super::state::TicketState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work tracked through the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub acceptance_criteria: String,
    pub state: TicketState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_persona_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// A new ticket in the initial lifecycle state.
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: title.into(),
            description: String::new(),
            acceptance_criteria: String::new(),
            state: TicketState::initial(),
            assigned_persona_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_acceptance_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.acceptance_criteria = criteria.into();
        self
    }

    pub fn with_state(mut self, state: TicketState) -> Self {
        self.state = state;
        self
    }

    pub fn with_assignee(mut self, persona_id: impl Into<String>) -> Self {
        self.assigned_persona_id = Some(persona_id.into());
        self
    }
}

/// A comment posted on a ticket by a persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub ticket_id: String,
    pub persona_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Identity an agent acts under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    /// Role (profile) name this persona usually runs with
    #[serde(default)]
    pub role: String,
}

impl Persona {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Kind of long-form document attached to a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Research,
    ImplementationPlan,
    Design,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Research,
        DocumentType::ImplementationPlan,
        DocumentType::Design,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Research => "research",
            DocumentType::ImplementationPlan => "implementation_plan",
            DocumentType::Design => "design",
        }
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|d| d.as_str().to_string()).collect()
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub ticket_id: String,
    pub doc_type: DocumentType,
    pub content: String,
    pub author_persona_id: String,
    pub created_at: DateTime<Utc>,
}
