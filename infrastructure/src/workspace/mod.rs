//! Workspace executors

pub mod local;

pub use local::LocalWorkspaceExecutor;
