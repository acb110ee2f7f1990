//! Tool Registry
//!
//! The [`ToolRegistry`] indexes tools by name and profiles by the ordered
//! tool names they may call, and implements [`ToolExecutorPort`].
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! for tool in builtin_tools(catalog.clone(), state_machine, params) {
//!     registry.register(tool)?;             // duplicate names fail here
//! }
//! registry.load_profiles(catalog.as_ref())?; // unknown tool names fail here
//!
//! let tools = registry.get_tools_for_profile("developer");
//! let result = registry.execute(&call, &ctx).await;
//! ```
//!
//! # Invariants
//!
//! - tool names are unique; a collision is a registration error, never a
//!   call-time surprise
//! - every name in a profile's allowlist is registered; checked when the
//!   profile is added
//! - listing is deterministic: registration order for tools, allowlist
//!   order for profiles
//!
//! Register everything before the first lookup; the registry is read-only
//! after startup and shared behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use board_application::context::ExecutionContext;
use board_application::ports::profile_catalog::ProfileCatalog;
use board_application::ports::tool_executor::{Tool, ToolExecutorPort};
use board_application::ports::tool_schema::{ToolSchemaPort, ToolSurface};
use board_domain::{ToolCall, ToolError, ToolResult};
use thiserror::Error;

use super::schema::JsonSchemaToolConverter;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Profile '{profile}' allows unknown tool '{tool}'")]
    UnknownTool { profile: String, tool: String },
}

/// Name- and profile-indexed tool registry
pub struct ToolRegistry {
    /// Tools in registration order
    tools: Vec<Arc<dyn Tool>>,
    /// Tool name -> index into `tools`
    index: HashMap<String, usize>,
    /// Profile name -> allowed tool names, in order
    profiles: HashMap<String, Vec<String>>,
    converter: Arc<dyn ToolSchemaPort>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            profiles: HashMap::new(),
            converter: Arc::new(JsonSchemaToolConverter),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        tracing::debug!(tool = %name, "Registered tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Add (or replace) a profile's allowlist.
    ///
    /// Duplicate names collapse to their first occurrence.
    pub fn register_profile<I, S>(&mut self, profile: &str, tools: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: Vec<String> = Vec::new();
        for tool in tools {
            let tool = tool.into();
            if !self.index.contains_key(&tool) {
                return Err(RegistryError::UnknownTool {
                    profile: profile.to_string(),
                    tool,
                });
            }
            if !allowed.contains(&tool) {
                allowed.push(tool);
            }
        }
        tracing::debug!(profile, tools = allowed.len(), "Registered profile");
        self.profiles.insert(profile.to_string(), allowed);
        Ok(())
    }

    /// Register every profile a catalog knows, failing on the first bad one.
    pub fn load_profiles(&mut self, catalog: &dyn ProfileCatalog) -> Result<(), RegistryError> {
        for name in catalog.profile_names() {
            if let Some(profile) = catalog.profile(&name) {
                self.register_profile(&name, profile.tools)?;
            }
        }
        Ok(())
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    /// Tools a profile may call, in allowlist order. Unknown profiles get
    /// nothing; names missing from the registry are skipped.
    pub fn get_tools_for_profile(&self, profile: &str) -> Vec<Arc<dyn Tool>> {
        let Some(names) = self.profiles.get(profile) else {
            tracing::debug!(profile, "Unknown profile, no tools");
            return Vec::new();
        };
        names
            .iter()
            .filter_map(|name| {
                let tool = self.get_tool(name);
                if tool.is_none() {
                    tracing::warn!(profile, tool = %name, "Profile lists unregistered tool");
                }
                tool
            })
            .collect()
    }

    /// Every registered name, in registration order
    pub fn get_all_tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Profile names, sorted
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn surfaces_for_profile(&self, profile: &str) -> Vec<ToolSurface> {
        self.get_tools_for_profile(profile)
            .iter()
            .map(|t| self.converter.tool_surface(t.definition()))
            .collect()
    }

    /// Surfaces for every registered tool
    pub fn all_surfaces(&self) -> Vec<ToolSurface> {
        self.tools
            .iter()
            .map(|t| self.converter.tool_surface(t.definition()))
            .collect()
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        let tools_per_profile = self
            .profiles
            .iter()
            .map(|(name, tools)| (name.clone(), tools.len()))
            .collect();

        RegistryStats {
            total_tools: self.tools.len(),
            total_profiles: self.profiles.len(),
            tools_per_profile,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the registry
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_tools: usize,
    pub total_profiles: usize,
    pub tools_per_profile: HashMap<String, usize>,
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn get_tool(&self, name: &str) -> Option<Arc<dyn Tool>> {
        ToolRegistry::get_tool(self, name)
    }

    fn all_tool_names(&self) -> Vec<String> {
        self.get_all_tool_names()
    }

    fn tools_for_profile(&self, profile: &str) -> Vec<Arc<dyn Tool>> {
        self.get_tools_for_profile(profile)
    }

    fn tool_surfaces_for_profile(&self, profile: &str) -> Vec<ToolSurface> {
        self.surfaces_for_profile(profile)
    }

    async fn execute(&self, call: &ToolCall, ctx: &ExecutionContext) -> ToolResult {
        let Some(tool) = ToolRegistry::get_tool(self, &call.tool_name) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(format!("tool '{}'", call.tool_name)),
            );
        };

        let start = Instant::now();
        let result = tool.handle(call.arguments.clone(), ctx).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result.error() {
            None => tracing::debug!(tool = %call.tool_name, duration_ms, "Tool succeeded"),
            Some(err) => tracing::debug!(
                tool = %call.tool_name,
                duration_ms,
                code = %err.code,
                "Tool returned error"
            ),
        }

        result.with_duration(duration_ms)
    }
}
