//! Domain layer for agent-board
//!
//! Pure types and logic for tool-mediated agent orchestration. No I/O and no
//! dependency on the application or infrastructure layers.
//!
//! # Core Concepts
//!
//! ## Tickets
//!
//! A [`Ticket`] moves through a fixed set of [`TicketState`]s. Every change
//! is checked against a total [`TransitionTable`]: forward progress plus
//! explicit rework edges, with `done` terminal.
//!
//! ## Tools
//!
//! A [`ToolDefinition`] declares its parameters as an [`ObjectSchema`], a
//! tree of [`FieldKind`]s that doubles as the validator for raw arguments.
//! Every invocation yields a [`ToolResult`]; failures are values.
//!
//! ## Runs
//!
//! An agent run ends exactly once with an [`AgentRunResult`]: a status,
//! comments in posting order, an optional requested state change (still
//! subject to the lifecycle guard) and token usage.

pub mod agent;
pub mod core;
pub mod prompt;
pub mod session;
pub mod ticket;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    AgentRunResult, CommentType, ConfigIssue, ConfigIssueCode, MAX_RUN_DURATION, Profile,
    RunComment, RunOutcome, RunPhase, RunStatus, Severity, TokenUsage, parse_run_outcome,
};
pub use core::error::DomainError;
pub use prompt::AgentPromptTemplate;
pub use session::response::{ContentBlock, LlmResponse, StopReason};
pub use ticket::{
    entities::{Comment, Document, DocumentType, Persona, Ticket},
    lifecycle::TransitionTable,
    state::TicketState,
};
pub use tool::{
    entities::{ToolCall, ToolDefinition},
    schema::{Field, FieldKind, ObjectSchema},
    value_objects::{ToolError, ToolResult, ToolResultMetadata},
};
