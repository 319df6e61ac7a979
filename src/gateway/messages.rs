//! Wire types for the data provider's `/request` API
//!
//! Field names are snake_case on the wire and in memory. Optional request
//! fields are omitted when absent, and unknown response fields are ignored.

use serde::{Deserialize, Serialize};

/// Response shape selector for SERP requests
pub const FORMAT_RAW: &str = "raw";

/// Response shape selector for page fetches wrapped in a JSON envelope
pub const FORMAT_JSON: &str = "json";

/// Content encoding selector asking the provider to render pages as markdown
pub const DATA_FORMAT_MARKDOWN: &str = "markdown";

/// Request body posted to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Provider-side capability selector
    pub zone: String,
    /// Target URL (search query URL or page URL)
    pub url: String,
    /// Response shape selector
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,
}

impl ProviderRequest {
    /// Request for a raw SERP JSON document
    pub fn serp(zone: &str, url: &str) -> Self {
        Self {
            zone: zone.to_string(),
            url: url.to_string(),
            format: FORMAT_RAW.to_string(),
            data_format: None,
        }
    }

    /// Request for an unlocked page fetch rendered as markdown
    pub fn markdown_page(zone: &str, url: &str) -> Self {
        Self {
            zone: zone.to_string(),
            url: url.to_string(),
            format: FORMAT_JSON.to_string(),
            data_format: Some(DATA_FORMAT_MARKDOWN.to_string()),
        }
    }
}

/// Structured search results in provider rank order.
/// A body without `organic` (e.g. a provider error envelope) does not decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub organic: Vec<OrganicEntry>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.organic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organic.is_empty()
    }
}

/// A single organic search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicEntry {
    pub link: String,
    pub title: String,
    pub description: String,
    /// Rank within the results page
    pub rank: u32,
    /// Rank across all result pages
    pub global_rank: u32,
}

/// Fetched page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub body: String,
}
