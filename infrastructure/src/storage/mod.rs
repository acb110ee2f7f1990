//! Ticket database adapters

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileDatabase;
pub use memory::{BoardSnapshot, InMemoryDatabase};
