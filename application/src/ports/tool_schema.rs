//! Tool schema conversion port.
//!
//! Separates "what a tool accepts" (the domain [`ObjectSchema`]) from "how
//! that is serialized for a model's function-calling API" (JSON Schema,
//! produced in infrastructure).

use board_domain::{ObjectSchema, ToolDefinition};
use serde::{Deserialize, Serialize};

/// The triple exposed to the model for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSurface {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Port for converting parameter descriptors to JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    fn to_json_schema(&self, schema: &ObjectSchema) -> serde_json::Value;

    fn tool_surface(&self, tool: &ToolDefinition) -> ToolSurface {
        ToolSurface {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: self.to_json_schema(tool.parameters()),
        }
    }
}
