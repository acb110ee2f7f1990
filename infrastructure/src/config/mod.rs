//! Configuration loading for agent-board
//!
//! Sources are merged with [`figment`]; see [`ConfigLoader`] for the order.
//! The raw [`FileConfig`] converts into the runtime values the rest of the
//! workspace uses: [`ExecutionParams`](board_application::ExecutionParams),
//! [`TransitionTable`](board_domain::TransitionTable) and a
//! [`StaticProfileCatalog`](crate::profiles::StaticProfileCatalog).

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileGatewayConfig, FileLifecycleConfig, FileProfileConfig,
    FileStorageConfig, FileWorkspaceConfig,
};
pub use loader::{ConfigError, ConfigLoader, ConfigSource, ENV_PREFIX, PROJECT_CONFIG_FILES};
