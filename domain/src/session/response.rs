//! Model response types for native tool use.
//!
//! A response is a list of content blocks mixing text and tool use requests,
//! plus the stop reason and the tokens the call consumed.
//!
//! ```text
//! send_with_tools()   ─▶ LlmResponse ─▶ tool_calls() ─▶ execute ─┐
//! send_tool_results() ◀──────────────────────────────────────────┘
//! ```

use crate::agent::run::TokenUsage;
use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// A single block of content within a model response.
///
/// ```
/// use board_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text("Let me read that file.".to_string());
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "call_abc123".to_string(),
///     name: "read_file".to_string(),
///     input: serde_json::json!({"path": "src/main.rs"}),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(String),

    /// A tool use request. `input` is passed to the tool unvalidated.
    ToolUse {
        /// Provider-assigned id, echoed back with the tool result
        id: String,
        name: String,
        input: serde_json::Value,
    },
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<(&str, &str, &serde_json::Value)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response
    EndTurn,
    /// The model wants tools executed and their results sent back
    ToolUse,
    /// Hit the token limit, response may be truncated
    MaxTokens,
    Other(String),
}

/// A structured model response.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub model: Option<String>,
    /// Tokens consumed by the call that produced this response
    pub usage: TokenUsage,
}

impl LlmResponse {
    /// A text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
            usage: TokenUsage::default(),
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Concatenate all `Text` content blocks.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all `ToolUse` blocks as [`ToolCall`]s, in request order.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCall::new(name.clone(), input.clone()).with_call_id(id.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_text_creates_text_only_response() {
        let response = LlmResponse::from_text("Hello, world!");
        assert_eq!(response.text_content(), "Hello, world!");
        assert!(!response.has_tool_calls());
        assert!(response.tool_calls().is_empty());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.usage.total(), 0);
    }

    #[test]
    fn tool_calls_keep_request_order_and_ids() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::Text("Reading first.".to_string()),
                ContentBlock::ToolUse {
                    id: "call_1".to_string(),
                    name: "read_file".to_string(),
                    input: json!({"path": "README.md"}),
                },
                ContentBlock::ToolUse {
                    id: "call_2".to_string(),
                    name: "git_status".to_string(),
                    input: json!({}),
                },
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: Some("gpt-4o".to_string()),
            usage: TokenUsage::new(120, 30),
        };

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "read_file");
        assert_eq!(calls[0].call_id.as_deref(), Some("call_1"));
        assert_eq!(calls[0].arguments["path"], "README.md");
        assert_eq!(calls[1].tool_name, "git_status");
        assert_eq!(response.text_content(), "Reading first.");
    }
}
