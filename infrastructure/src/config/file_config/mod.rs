//! Raw TOML configuration data types
//!
//! These structs mirror the config file one-to-one. Each section knows how
//! to validate itself and how to turn into the runtime value it configures.

mod agent;
mod gateway;
mod lifecycle;
mod profiles;
mod storage;
mod workspace;

pub use agent::FileAgentConfig;
pub use gateway::FileGatewayConfig;
pub use lifecycle::FileLifecycleConfig;
pub use profiles::FileProfileConfig;
pub use storage::FileStorageConfig;
pub use workspace::FileWorkspaceConfig;

use crate::profiles::StaticProfileCatalog;
use board_application::ExecutionParams;
use board_domain::{ConfigIssue, TransitionTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub agent: FileAgentConfig,
    pub gateway: FileGatewayConfig,
    pub workspace: FileWorkspaceConfig,
    pub storage: FileStorageConfig,
    pub lifecycle: FileLifecycleConfig,
    pub profiles: BTreeMap<String, FileProfileConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.agent.validate());
        issues.extend(self.gateway.validate());
        issues.extend(self.workspace.validate());
        issues.extend(self.lifecycle.to_transition_table().1);
        issues.extend(profiles::validate_profiles(&self.profiles));
        issues
    }

    pub fn execution_params(&self) -> ExecutionParams {
        self.workspace
            .execution_params(self.agent.max_tool_turns)
    }

    pub fn transition_table(&self) -> TransitionTable {
        self.lifecycle.to_transition_table().0
    }

    pub fn profile_catalog(&self) -> StaticProfileCatalog {
        profiles::build_catalog(&self.profiles)
    }
}
