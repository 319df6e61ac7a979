//! Testing utilities and mock implementations
//!
//! Mocks for exercising the agent loop without an LLM or the data provider.

pub mod mocks;

pub use mocks::*;
