//! HTTP gateway to the data provider
//!
//! One configured client shared by every tool. It owns the provider's base
//! URL, the JSON content type and the bearer token, and turns each call into
//! exactly one `POST {base_url}/request`. There is no retry, caching or rate
//! limiting here; failures go straight back to the calling tool.

pub mod messages;

pub use messages::{OrganicEntry, PageContent, ProviderRequest, SearchResult};

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default provider API endpoint
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.brightdata.com";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Gateway errors, kept distinct so callers can tell them apart
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Provider gateway not configured: {0}")]
    NotConfigured(String),
    #[error("Provider request failed: {0}")]
    Transport(String),
    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// HTTP status for provider errors
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configured HTTP client for the provider's `/request` endpoint
#[derive(Debug, Clone)]
pub struct ProviderGateway {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ProviderGateway {
    /// Create a gateway; fails when the API key is empty
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::NotConfigured(
                "provider API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: Self::request_endpoint(&config.base_url),
            api_key: config.api_key,
        })
    }

    /// Build the request endpoint from a base URL (pure function)
    fn request_endpoint(base_url: &str) -> String {
        format!("{}/request", base_url.trim_end_matches('/'))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a request and return the raw body of a 2xx response
    pub async fn post(&self, request: &ProviderRequest) -> Result<String, GatewayError> {
        debug!(
            zone = %request.zone,
            format = %request.format,
            url = %request.url,
            "Sending provider request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                GatewayError::Transport(format!(
                    "{e} (is_connect: {}, is_timeout: {})",
                    e.is_connect(),
                    e.is_timeout()
                ))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), zone = %request.zone, "Provider error response");
            return Err(GatewayError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        debug!(bytes = body.len(), "Provider response received");
        Ok(body)
    }

    /// Send a request and decode the JSON response body
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        request: &ProviderRequest,
    ) -> Result<T, GatewayError> {
        let body = self.post(request).await?;
        decode_body(&body)
    }
}

/// Decode a provider response body (pure function)
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_config_default() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "https://api.brightdata.com");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_gateway_creation_without_api_key() {
        let result = ProviderGateway::new(GatewayConfig::default());
        assert!(matches!(result, Err(GatewayError::NotConfigured(_))));
    }

    #[test]
    fn test_gateway_creation_with_blank_api_key() {
        let config = GatewayConfig {
            api_key: "   ".to_string(),
            ..Default::default()
        };
        assert!(ProviderGateway::new(config).is_err());
    }

    #[test]
    fn test_gateway_endpoint() {
        let config = GatewayConfig {
            api_key: "key".to_string(),
            base_url: "http://localhost:9000/".to_string(),
            ..Default::default()
        };
        let gateway = ProviderGateway::new(config).unwrap();
        assert_eq!(gateway.endpoint(), "http://localhost:9000/request");
    }

    #[test]
    fn test_decode_body_malformed() {
        let result: Result<PageContent, _> = decode_body("{not json");
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_status_accessor() {
        let error = GatewayError::Provider {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(error.status(), Some(403));
        assert_eq!(GatewayError::Decode("x".to_string()).status(), None);
    }
}
