//! Agent profiles (roles)

use serde::{Deserialize, Serialize};

/// A named allowlist of tools plus the prompt text handed to the reasoning
/// step. The prompt text is opaque to the orchestration core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Tool names this profile may call, in listing order
    pub tools: Vec<String>,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub workflow: String,
}

impl Profile {
    pub fn new<I, S>(name: impl Into<String>, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            tools: tools.into_iter().map(Into::into).collect(),
            system_prompt: String::new(),
            workflow: String::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = workflow.into();
        self
    }

    pub fn allows(&self, tool_name: &str) -> bool {
        self.tools.iter().any(|t| t == tool_name)
    }
}
