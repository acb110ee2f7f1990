//! Tool domain module
//!
//! Pure definitions of the capability surface agents act through:
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ + ObjectSchema │    │ (invocation) │    │ (output)     │
//! └────────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! - [`ObjectSchema`] / [`FieldKind`]: typed parameter descriptors, converted
//!   to JSON schema by the infrastructure layer and used here to validate and
//!   coerce raw arguments
//! - [`ToolDefinition`]: name, description, parameters
//! - [`ToolCall`]: a model's request to run a tool
//! - [`ToolResult`] / [`ToolError`]: the outcome, failures included
//!
//! The executable side (`Tool::handle`) lives in the application layer
//! because it needs the execution context and collaborator ports.

pub mod entities;
pub mod schema;
pub mod validation;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition};
pub use schema::{Field, FieldKind, ObjectSchema};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
