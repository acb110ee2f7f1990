//! Model session domain.
//!
//! - [`response::LlmResponse`]: a structured model response with usage
//! - [`response::ContentBlock`]: text or tool use

pub mod response;
