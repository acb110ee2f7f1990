//! Port definitions (interfaces for external adapters)
//!
//! Implemented by the infrastructure layer; use cases depend only on these.

pub mod agent_runner;
pub mod conversation_logger;
pub mod database;
pub mod llm_gateway;
pub mod profile_catalog;
pub mod tool_executor;
pub mod tool_schema;
pub mod workspace_executor;
