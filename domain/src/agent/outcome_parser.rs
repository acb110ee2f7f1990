//! Run outcome parsing from the model's final answer.
//!
//! The system prompt asks the model to end with a fenced block tagged
//! `result` whose body is JSON:
//!
//! ```text
//! {"status": "completed",
//!  "comments": [{"type": "completion", "content": "Implemented the endpoint"}],
//!  "ticket_state_change": "verification"}
//! ```
//!
//! A raw JSON object spanning the whole answer is accepted too.

use super::run::{CommentType, RunComment, RunOutcome, RunStatus};
use crate::ticket::state::TicketState;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawOutcome {
    status: String,
    #[serde(default)]
    comments: Vec<RawComment>,
    #[serde(default, alias = "ticketStateChange")]
    ticket_state_change: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default, rename = "type")]
    comment_type: Option<CommentType>,
    content: String,
}

/// Parse the run outcome from final answer text.
///
/// The last valid `result` block wins, so an example block quoted earlier in
/// the answer is ignored. Returns `None` when no block is present or no block
/// describes a `completed` or `blocked` outcome with a known target state.
pub fn parse_run_outcome(text: &str) -> Option<RunOutcome> {
    let mut in_block = false;
    let mut current = String::new();
    let mut last = None;

    for line in text.lines() {
        if line.trim() == "```result" {
            in_block = true;
            current.clear();
        } else if in_block && line.trim() == "```" {
            in_block = false;
            if let Some(outcome) = parse_outcome_json(&current) {
                last = Some(outcome);
            }
        } else if in_block {
            current.push_str(line);
            current.push('\n');
        }
    }

    last.or_else(|| parse_outcome_json(text.trim()))
}

fn parse_outcome_json(json: &str) -> Option<RunOutcome> {
    let raw: RawOutcome = serde_json::from_str(json).ok()?;

    let status: RunStatus = raw.status.parse().ok()?;
    if !status.may_change_state() {
        return None;
    }

    let ticket_state_change = match raw.ticket_state_change.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(name) => Some(name.parse::<TicketState>().ok()?),
    };

    let default_type = match status {
        RunStatus::Blocked => CommentType::Question,
        _ => CommentType::Completion,
    };
    let comments = raw
        .comments
        .into_iter()
        .filter(|c| !c.content.trim().is_empty())
        .map(|c| RunComment::new(c.comment_type.unwrap_or(default_type), c.content))
        .collect();

    Some(RunOutcome {
        status,
        comments,
        ticket_state_change,
    })
}
