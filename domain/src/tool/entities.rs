//! Tool domain entities

use super::schema::ObjectSchema;
use serde::{Deserialize, Serialize};

/// Definition of a tool an agent can invoke.
///
/// Immutable once built: the name is the registry key, the description is
/// what the model reads to decide applicability, and `parameters` is the
/// typed descriptor both the schema converter and argument validation use.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    name: String,
    description: String,
    parameters: ObjectSchema,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ObjectSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &ObjectSchema {
        &self.parameters
    }
}

/// A call to a tool with arguments, as requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Raw, unvalidated arguments
    #[serde(default)]
    pub arguments: serde_json::Value,
    /// Provider-assigned call id, echoed back with the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            call_id: None,
        }
    }

    pub fn with_call_id(mut self, id: impl Into<String>) -> Self {
        self.call_id = Some(id.into());
        self
    }
}
