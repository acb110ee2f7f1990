//! Reasoning gateway adapters

pub mod openai;

pub use openai::{OpenAiCompatibleGateway, OpenAiSession};
