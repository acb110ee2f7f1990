//! Prompt domain
//!
//! Templates for the system prompt and first user turn of an agent run.

pub mod agent;

pub use agent::AgentPromptTemplate;
