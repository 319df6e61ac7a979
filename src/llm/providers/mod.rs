//! LLM provider implementations

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiProvider};
