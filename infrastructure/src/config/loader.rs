//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use board_domain::ConfigIssue;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level file names, first match wins
pub const PROJECT_CONFIG_FILES: [&str; 2] = ["board.toml", ".board.toml"];

/// Prefix for environment overrides; `__` separates nesting levels
pub const ENV_PREFIX: &str = "BOARD_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One place configuration may come from, for `agent-board config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub path: Option<PathBuf>,
    pub found: bool,
}

/// Configuration loader that handles file discovery and merging
///
/// Priority (highest to lowest):
/// 1. `BOARD_*` environment variables (`BOARD_GATEWAY__MODEL=...`)
/// 2. Explicit `--config <path>`
/// 3. Project: `./board.toml` or `./.board.toml`
/// 4. Global: `~/.config/agent-board/config.toml`
/// 5. Built-in defaults
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    global: Option<PathBuf>,
    project_dir: PathBuf,
    explicit: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            global: Self::global_config_path(),
            project_dir: PathBuf::from("."),
            explicit: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn with_global(mut self, path: Option<PathBuf>) -> Self {
        self.global = path;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// `~/.config/agent-board/config.toml` (XDG config dir on Linux)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("agent-board").join("config.toml"))
    }

    pub fn project_config_path(&self) -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|path| path.exists())
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global) = self.global.as_deref().filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global));
        }
        if let Some(project) = self.project_config_path() {
            figment = figment.merge(Toml::file(project));
        }
        if let Some(explicit) = &self.explicit {
            // Explicit files must exist; a typo should not silently fall back.
            figment = figment.merge(Toml::file_exact(explicit));
        }

        figment.merge(Env::prefixed(&self.env_prefix).split("__"))
    }

    /// Merge every source. Does not validate.
    pub fn load(&self) -> Result<FileConfig, ConfigError> {
        self.figment().extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Merge and validate. Warnings are logged; any error aborts.
    pub fn load_validated(&self) -> Result<FileConfig, ConfigError> {
        let config = self.load()?;
        let (errors, warnings): (Vec<_>, Vec<_>) =
            config.validate().into_iter().partition(ConfigIssue::is_error);

        for warning in &warnings {
            tracing::warn!("{}", warning.message);
        }
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Every file source in priority order, with whether it exists.
    pub fn sources(&self) -> Vec<ConfigSource> {
        let exists = |p: &Option<PathBuf>| p.as_deref().is_some_and(Path::exists);
        let project = self
            .project_config_path()
            .or_else(|| Some(self.project_dir.join(PROJECT_CONFIG_FILES[0])));

        let mut sources = Vec::new();
        if self.explicit.is_some() {
            sources.push(ConfigSource {
                label: "explicit",
                found: exists(&self.explicit),
                path: self.explicit.clone(),
            });
        }
        sources.push(ConfigSource {
            label: "project",
            found: exists(&project),
            path: project,
        });
        sources.push(ConfigSource {
            label: "global",
            found: exists(&self.global),
            path: self.global.clone(),
        });
        sources
    }
}
