//! Board storage configuration (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
///
/// ```toml
/// [storage]
/// board_path = ".board/board.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// JSON board file; relative paths resolve against the working directory
    pub board_path: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            board_path: PathBuf::from(".board/board.json"),
        }
    }
}
