//! Agent runners that carry the run loop outside the calling process

pub mod process;
pub mod wire;

pub use process::ProcessAgentRunner;
pub use wire::{RunRequest, WireError, read_request, write_result};
