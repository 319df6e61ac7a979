//! Agent loop and startup wiring

pub mod bootstrap;
pub mod query;

pub use bootstrap::{build_agent, build_llm_provider, build_tool_registry};
pub use query::{AgentSettings, QueryAgent};
