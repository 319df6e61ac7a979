//! Search Agent
//!
//! A tool-augmented LLM query pipeline: an agent loop drives an LLM that can
//! call two tools, `search` (Google results through a data provider's SERP
//! zone) and `scrape` (a page fetched through the provider's unlocker zone,
//! rendered as markdown and length-bounded).
//!
//! # Overview
//!
//! - [`gateway`]: the one HTTP client that talks to the provider
//! - [`tools`]: the `Tool` trait, the registry and the builtin tools
//! - [`llm`]: provider-agnostic chat completions, OpenAI implementation
//! - [`agent`]: the bounded tool-calling loop and startup wiring
//! - [`config`] / [`credentials`]: TOML settings and the secret chain
//!
//! # Quick Start
//!
//! ```rust
//! use search_agent::gateway::ProviderRequest;
//! use search_agent::tools::builtin::{WebScrapeTool, WebSearchTool};
//! use url::Url;
//!
//! let engine = Url::parse("https://www.google.com/search").unwrap();
//! let url = WebSearchTool::build_search_url(&engine, "capital of France");
//! assert_eq!(url.as_str(), "https://www.google.com/search?brd_json=1&q=capital+of+France");
//!
//! let request = ProviderRequest::markdown_page("web_unlocker1", "https://example.com");
//! assert_eq!(request.data_format.as_deref(), Some("markdown"));
//!
//! assert_eq!(WebScrapeTool::truncate_body("hello world", 5), "hello");
//! ```

pub mod agent;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod observability;
pub mod testing;
pub mod tools;

pub use agent::{AgentSettings, QueryAgent};
pub use config::{AppConfig, ConfigError};
pub use credentials::{load_credentials, CredentialChain, CredentialSource, Credentials};
pub use error::{AgentError, AgentResult};
pub use gateway::{
    GatewayConfig, GatewayError, OrganicEntry, PageContent, ProviderGateway, ProviderRequest,
    SearchResult,
};
pub use tools::{Tool, ToolDescription, ToolError, ToolParameter, ToolRegistry};
