//! LLM provider abstraction layer
//!
//! A provider-agnostic interface for chat completions with tool calling,
//! plus the OpenAI implementation used by the agent.

pub mod provider;
pub mod providers;

pub use provider::*;
pub use providers::*;
