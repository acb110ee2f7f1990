//! Reasoning gateway configuration (`[gateway]` section)

use board_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw gateway configuration from TOML
///
/// # Example
///
/// ```toml
/// [gateway]
/// base_url = "http://localhost:11434/v1"
/// model = "qwen2.5-coder"
/// api_key_env = "OPENAI_API_KEY"
/// ```
///
/// The key itself never lives in the file; only the variable to read it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl FileGatewayConfig {
    /// Read the API key from the configured variable; unset or empty is `None`.
    pub fn api_key(&self) -> Option<String> {
        if self.api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.model.trim().is_empty() {
            vec![ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                "gateway.model is empty",
            )]
        } else {
            Vec::new()
        }
    }
}
