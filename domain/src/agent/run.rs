//! Run lifecycle and the result contract every runner produces

use crate::core::error::DomainError;
use crate::ticket::state::TicketState;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Longest run budget honoured. Larger budgets are clamped to it, which keeps
/// deadline arithmetic clear of `Instant` overflow.
pub const MAX_RUN_DURATION: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// Phase of a single agent run.
///
/// ```text
/// Pending ──▶ Running ──┬─▶ Completed
///                       ├─▶ Blocked
///                       ├─▶ Timeout
///                       └─▶ Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Pending,
    Running,
    Completed,
    Blocked,
    Timeout,
    Error,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RunPhase::Pending | RunPhase::Running)
    }

    pub fn can_advance_to(&self, next: RunPhase) -> bool {
        match self {
            RunPhase::Pending => next == RunPhase::Running,
            RunPhase::Running => next.is_terminal(),
            _ => false,
        }
    }
}

impl From<RunStatus> for RunPhase {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => RunPhase::Completed,
            RunStatus::Blocked => RunPhase::Blocked,
            RunStatus::Timeout => RunPhase::Timeout,
            RunStatus::Error => RunPhase::Error,
        }
    }
}

/// Terminal status reported in an [`AgentRunResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Blocked,
    Timeout,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Blocked => "blocked",
            RunStatus::Timeout => "timeout",
            RunStatus::Error => "error",
        }
    }

    /// Only runs that ended on the model's own terms may request a state change.
    pub fn may_change_state(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Blocked)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(RunStatus::Completed),
            "blocked" => Ok(RunStatus::Blocked),
            "timeout" => Ok(RunStatus::Timeout),
            "error" => Ok(RunStatus::Error),
            _ => Err(DomainError::UnknownRunStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    Question,
    Status,
    Completion,
}

impl CommentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentType::Question => "question",
            CommentType::Status => "status",
            CommentType::Completion => "completion",
        }
    }
}

impl std::fmt::Display for CommentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A comment the run wants posted on its ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunComment {
    pub content: String,
    #[serde(rename = "type")]
    pub comment_type: CommentType,
}

impl RunComment {
    pub fn new(comment_type: CommentType, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            comment_type,
        }
    }

    pub fn status(content: impl Into<String>) -> Self {
        Self::new(CommentType::Status, content)
    }

    pub fn question(content: impl Into<String>) -> Self {
        Self::new(CommentType::Question, content)
    }

    pub fn completion(content: impl Into<String>) -> Self {
        Self::new(CommentType::Completion, content)
    }

    /// Comment body as posted on the ticket, tagged with its type.
    pub fn tagged(&self) -> String {
        format!("[{}] {}", self.comment_type, self.content)
    }
}

/// Token counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

impl TokenUsage {
    pub fn new(input: u64, output: u64) -> Self {
        Self { input, output }
    }

    pub fn add(&mut self, other: TokenUsage) {
        self.input = self.input.saturating_add(other.input);
        self.output = self.output.saturating_add(other.output);
    }

    pub fn total(&self) -> u64 {
        self.input.saturating_add(self.output)
    }
}

/// What the model reported at the end of a run, before the runner attaches
/// token counts and timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub comments: Vec<RunComment>,
    pub ticket_state_change: Option<TicketState>,
}

impl RunOutcome {
    /// Fallback outcome when the model finished without a result block.
    pub fn from_plain_text(text: &str) -> Self {
        let text = text.trim();
        let comments = if text.is_empty() {
            Vec::new()
        } else {
            vec![RunComment::completion(text)]
        };
        Self {
            status: RunStatus::Completed,
            comments,
            ticket_state_change: None,
        }
    }
}

/// Final, single result of an agent run.
///
/// `comments` are in posting order. `ticket_state_change` is a request that
/// still has to pass the lifecycle guard, and is only ever set on
/// `completed` or `blocked` runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRunResult {
    pub status: RunStatus,
    #[serde(default)]
    pub comments: Vec<RunComment>,
    #[serde(
        default,
        alias = "ticketStateChange",
        skip_serializing_if = "Option::is_none"
    )]
    pub ticket_state_change: Option<TicketState>,
    #[serde(default, alias = "tokensUsed")]
    pub tokens_used: TokenUsage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, alias = "durationMs")]
    pub duration_ms: u64,
}

impl AgentRunResult {
    pub fn from_outcome(outcome: RunOutcome, tokens_used: TokenUsage, duration_ms: u64) -> Self {
        let ticket_state_change = outcome
            .ticket_state_change
            .filter(|_| outcome.status.may_change_state());
        Self {
            status: outcome.status,
            comments: outcome.comments,
            ticket_state_change,
            tokens_used,
            error: None,
            duration_ms,
        }
    }

    /// The duration budget ran out. Never carries a state change.
    pub fn timeout(comments: Vec<RunComment>, tokens_used: TokenUsage, duration_ms: u64) -> Self {
        Self {
            status: RunStatus::Timeout,
            comments,
            ticket_state_change: None,
            tokens_used,
            error: None,
            duration_ms,
        }
    }

    /// The run failed. Never carries a state change.
    pub fn failed(
        message: impl Into<String>,
        comments: Vec<RunComment>,
        tokens_used: TokenUsage,
        duration_ms: u64,
    ) -> Self {
        Self {
            status: RunStatus::Error,
            comments,
            ticket_state_change: None,
            tokens_used,
            error: Some(message.into()),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}
