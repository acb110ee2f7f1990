//! LLM Gateway port
//!
//! Defines the interface for communicating with the reasoning model.

use crate::ports::tool_schema::ToolSurface;
use async_trait::async_trait;
use board_domain::LlmResponse;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

/// Result of one tool call, sent back to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResultMessage {
    /// Provider-assigned id of the tool use being answered
    pub tool_use_id: String,
    pub tool_name: String,
    pub output: String,
    pub is_error: bool,
}

/// Gateway for model communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new conversation with the given system prompt
    async fn create_session(&self, system_prompt: &str)
    -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}

/// An active conversation. Keeps its own message history.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Send a user turn, offering `tools` for function calling
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[ToolSurface],
    ) -> Result<LlmResponse, GatewayError>;

    /// Answer the previous response's tool calls
    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError>;
}
