//! Page scraping tool implementation
//!
//! Fetches a page through the provider's unlocker zone, rendered as
//! markdown, and bounds the body so a single page cannot flood the model's
//! context window.

use crate::gateway::{PageContent, ProviderGateway, ProviderRequest};
use crate::tools::{Tool, ToolDescription, ToolError, ToolParameter};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, Instrument};

/// Default cap on scraped page length, in characters
pub const DEFAULT_MAX_PAGE_CHARS: usize = 50_000;

/// Page scraping tool backed by the provider's unlocker zone
pub struct WebScrapeTool {
    gateway: Arc<ProviderGateway>,
    zone: String,
    max_chars: usize,
}

impl WebScrapeTool {
    pub fn new(gateway: Arc<ProviderGateway>, zone: &str, max_chars: usize) -> Self {
        Self {
            gateway,
            zone: zone.to_string(),
            max_chars,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Build the provider request for a page (pure function)
    pub fn build_request(&self, url: &str) -> ProviderRequest {
        ProviderRequest::markdown_page(&self.zone, url)
    }

    /// Descriptor for the scrape tool with the given page limit; needs no gateway
    pub fn description(max_chars: usize) -> ToolDescription {
        ToolDescription {
            name: "scrape".to_string(),
            description: format!(
                "Fetch a web page and return its content as markdown (at most {max_chars} characters)"
            ),
            parameters: vec![ToolParameter::string(
                "url",
                "Absolute URL of the page to fetch",
            )],
        }
    }

    /// Cut `body` to at most `max_chars` characters (pure function).
    /// Hard cut: no trimming and no word or sentence alignment.
    pub fn truncate_body(body: &str, max_chars: usize) -> &str {
        match body.char_indices().nth(max_chars) {
            Some((byte_index, _)) => &body[..byte_index],
            None => body,
        }
    }

    fn validate_url(url: Option<&str>) -> Result<&str, ToolError> {
        match url {
            Some(u) if !u.trim().is_empty() => Ok(u),
            Some(_) => Err(ToolError::InvalidArguments(
                "url must not be empty".to_string(),
            )),
            None => Err(ToolError::InvalidArguments(
                "url parameter is required".to_string(),
            )),
        }
    }

    /// Fetch a page as markdown through the provider
    pub async fn scrape(&self, url: &str) -> Result<PageContent, ToolError> {
        let url = Self::validate_url(Some(url))?;
        let request = self.build_request(url);

        let page: PageContent = self
            .gateway
            .post_json(&request)
            .instrument(crate::tool_span!(tool = "scrape", zone = %self.zone))
            .await?;

        let truncated = Self::truncate_body(&page.body, self.max_chars);
        if truncated.len() < page.body.len() {
            debug!(
                original_bytes = page.body.len(),
                max_chars = self.max_chars,
                "Scraped page truncated"
            );
            return Ok(PageContent {
                body: truncated.to_string(),
            });
        }

        Ok(page)
    }
}

#[async_trait]
impl Tool for WebScrapeTool {
    fn describe(&self) -> ToolDescription {
        Self::description(self.max_chars)
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let url = Self::validate_url(parameters.get("url").and_then(Value::as_str))?;
        let page = self.scrape(url).await?;
        Ok(Value::String(page.body))
    }
}
