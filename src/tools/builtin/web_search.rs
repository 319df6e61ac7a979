//! Web search tool implementation
//!
//! Wraps a Google results URL in a SERP request to the data provider and
//! returns the organic results exactly as ranked by the provider.

use crate::gateway::{ProviderGateway, ProviderRequest, SearchResult};
use crate::tools::{Tool, ToolDescription, ToolError, ToolParameter};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, Instrument};
use url::Url;

/// Query parameter asking the provider for parsed JSON instead of HTML
const JSON_OUTPUT_PARAM: (&str, &str) = ("brd_json", "1");

/// Web search tool backed by the provider's SERP zone
pub struct WebSearchTool {
    gateway: Arc<ProviderGateway>,
    zone: String,
    search_engine_url: Url,
}

impl WebSearchTool {
    pub fn new(gateway: Arc<ProviderGateway>, zone: &str, search_engine_url: Url) -> Self {
        Self {
            gateway,
            zone: zone.to_string(),
            search_engine_url,
        }
    }

    /// Build the search engine URL for a query (pure function)
    pub fn build_search_url(base: &Url, query: &str) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair(JSON_OUTPUT_PARAM.0, JSON_OUTPUT_PARAM.1)
            .append_pair("q", query);
        url
    }

    /// Build the provider request for a query (pure function)
    pub fn build_request(&self, query: &str) -> ProviderRequest {
        let url = Self::build_search_url(&self.search_engine_url, query);
        ProviderRequest::serp(&self.zone, url.as_str())
    }

    /// Descriptor for the search tool; needs no gateway
    pub fn description() -> ToolDescription {
        ToolDescription {
            name: "search".to_string(),
            description: "Search Google and return ranked organic results (link, title, \
                          description, rank)"
                .to_string(),
            parameters: vec![ToolParameter::string("query", "Search query text")],
        }
    }

    /// Validate the query argument (pure function)
    fn validate_query(query: Option<&str>) -> Result<&str, ToolError> {
        match query {
            Some(q) if !q.trim().is_empty() => Ok(q),
            Some(_) => Err(ToolError::InvalidArguments(
                "query must not be empty".to_string(),
            )),
            None => Err(ToolError::InvalidArguments(
                "query parameter is required".to_string(),
            )),
        }
    }

    /// Run a Google search through the provider
    pub async fn search(&self, query: &str) -> Result<SearchResult, ToolError> {
        let query = Self::validate_query(Some(query))?;
        let request = self.build_request(query);

        let result: SearchResult = self
            .gateway
            .post_json(&request)
            .instrument(crate::tool_span!(tool = "search", zone = %self.zone))
            .await?;

        debug!(results = result.len(), "Search completed");
        Ok(result)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn describe(&self) -> ToolDescription {
        Self::description()
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let query = Self::validate_query(parameters.get("query").and_then(Value::as_str))?;
        let result = self.search(query).await?;
        serde_json::to_value(result.organic)
            .map_err(|e| ToolError::ResultEncoding(e.to_string()))
    }
}
