//! Application-level configuration.
//!
//! - [`ExecutionParams`]: run loop control (tool turns, command timeouts)

pub mod execution_params;

pub use execution_params::ExecutionParams;
