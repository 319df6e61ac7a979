//! Builtin tools backed by the data provider
//!
//! Both tools share one [`ProviderGateway`]; each holds only its own zone
//! and limits.

pub mod web_scrape;
pub mod web_search;

pub use web_scrape::WebScrapeTool;
pub use web_search::WebSearchTool;

use crate::config::{ConfigError, ProviderSection};
use crate::gateway::ProviderGateway;
use crate::tools::{Tool, ToolDescription};
use std::sync::Arc;
use url::Url;

/// The fixed tool set: `search` then `scrape`
pub fn web_tools(
    gateway: Arc<ProviderGateway>,
    provider: &ProviderSection,
) -> Result<Vec<Box<dyn Tool>>, ConfigError> {
    let search_engine_url = Url::parse(&provider.search_engine_url).map_err(|e| {
        ConfigError::InvalidConfig(format!("provider.search_engine_url is invalid: {e}"))
    })?;

    Ok(vec![
        Box::new(WebSearchTool::new(
            gateway.clone(),
            &provider.serp_zone,
            search_engine_url,
        )),
        Box::new(WebScrapeTool::new(
            gateway,
            &provider.unlocker_zone,
            provider.max_page_chars,
        )),
    ])
}

/// Descriptors of the tools `web_tools` would build, without a gateway or key
pub fn web_tool_descriptions(provider: &ProviderSection) -> Vec<ToolDescription> {
    vec![
        WebSearchTool::description(),
        WebScrapeTool::description(provider.max_page_chars),
    ]
}
