//! Infrastructure layer for agent-board
//!
//! Adapters for the application ports: the tool catalogue and registry, a
//! local workspace executor, ticket stores, the OpenAI-compatible reasoning
//! gateway, the child-process runner, run transcripts and configuration.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod profiles;
pub mod runner;
pub mod storage;
pub mod tools;
pub mod workspace;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigSource, FileConfig};
pub use gateway::OpenAiCompatibleGateway;
pub use logging::JsonlConversationLogger;
pub use profiles::StaticProfileCatalog;
pub use runner::{ProcessAgentRunner, RunRequest};
pub use storage::{BoardSnapshot, InMemoryDatabase, JsonFileDatabase};
pub use tools::{
    BUILTIN_TOOL_NAMES, JsonSchemaToolConverter, RegistryError, RegistryStats, ToolRegistry,
    build_registry, builtin_tools,
};
pub use workspace::LocalWorkspaceExecutor;
