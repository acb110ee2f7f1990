//! Tickets and their guarded lifecycle

pub mod entities;
pub mod lifecycle;
pub mod state;
