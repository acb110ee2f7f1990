//! Application layer for agent-board
//!
//! Ports for every collaborator (workspace, database, model, tools,
//! profiles, transcript), the [`ExecutionContext`] that scopes a tool call,
//! and the use cases built on them. Depends only on the domain layer.

pub mod config;
pub mod context;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use context::{ExecutionContext, ExecutionContextBuilder, Workspace, WorkspaceInfo, parse_params};
pub use ports::{
    agent_runner::{AgentRunParams, AgentRunner},
    conversation_logger::{
        ConversationEvent, ConversationLogger, NoConversationLogger, RecordingConversationLogger,
    },
    database::{DatabaseError, DatabaseOperations, NewDocument},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage},
    profile_catalog::ProfileCatalog,
    tool_executor::{Tool, ToolExecutorPort},
    tool_schema::{ToolSchemaPort, ToolSurface},
    workspace_executor::{CommandOutput, RunOptions, WorkspaceError, WorkspaceExecutor},
};
pub use use_cases::apply_run_result::{AppliedRunResult, ApplyRunResultUseCase};
pub use use_cases::run_agent::{RunAgentError, RunAgentUseCase};
pub use use_cases::transition_ticket::{TicketStateMachine, TransitionError};
