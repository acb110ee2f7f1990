//! Role profile overrides (`[profiles.<name>]` sections)

use crate::profiles::StaticProfileCatalog;
use crate::tools::BUILTIN_TOOL_NAMES;
use board_application::ports::profile_catalog::ProfileCatalog;
use board_domain::{ConfigIssue, ConfigIssueCode, Profile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw profile from TOML
///
/// ```toml
/// [profiles.developer]
/// tools = ["read_file", "edit_file", "run_command"]
///
/// [profiles.docs]
/// tools = ["read_file", "write_file"]
/// system_prompt = "You maintain the documentation."
/// ```
///
/// A profile named like a built-in one replaces its tool list and keeps
/// its prompts unless they are given too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProfileConfig {
    pub tools: Vec<String>,
    pub system_prompt: Option<String>,
    pub workflow: Option<String>,
}

/// Built-in profiles with the configured ones layered on top.
pub fn build_catalog(profiles: &BTreeMap<String, FileProfileConfig>) -> StaticProfileCatalog {
    let builtin = StaticProfileCatalog::builtin();
    profiles
        .iter()
        .fold(builtin.clone(), |catalog, (name, config)| {
            let base = builtin.profile(name);
            let mut profile = Profile::new(name.clone(), config.tools.iter().cloned());
            profile.system_prompt = config
                .system_prompt
                .clone()
                .or_else(|| base.as_ref().map(|p| p.system_prompt.clone()))
                .unwrap_or_default();
            profile.workflow = config
                .workflow
                .clone()
                .or_else(|| base.as_ref().map(|p| p.workflow.clone()))
                .unwrap_or_default();
            catalog.with_profile(profile)
        })
}

pub fn validate_profiles(profiles: &BTreeMap<String, FileProfileConfig>) -> Vec<ConfigIssue> {
    profiles
        .iter()
        .flat_map(|(name, config)| {
            config
                .tools
                .iter()
                .filter(|tool| !BUILTIN_TOOL_NAMES.contains(&tool.as_str()))
                .map(move |tool| {
                    ConfigIssue::error(
                        ConfigIssueCode::UnknownTool,
                        format!("profiles.{}: unknown tool '{}'", name, tool),
                    )
                })
        })
        .collect()
}
