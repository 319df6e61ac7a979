//! Configuration for the search agent
//!
//! Loaded from a TOML file. Every field has a default, so the agent also
//! runs with no file at all. Secrets never live here; see
//! [`crate::credentials`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default system prompt for the query agent
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a research assistant. Use the `search` tool to \
find relevant pages and the `scrape` tool to read them, then answer the user's question \
concisely and cite the URLs you relied on.";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub credentials: CredentialsSection,
}

/// LLM and agent loop settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSection {
    /// Provider name; only "openai" is supported
    pub provider: String,
    /// Model identifier
    pub model: String,
    /// Override for the provider's API base URL
    pub base_url: Option<String>,
    pub system_prompt: String,
    /// Optional temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Maximum completions per run
    pub max_iterations: usize,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
    /// Optional deadline for a whole run
    pub run_timeout_secs: Option<u64>,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: None,
            max_tokens: None,
            max_iterations: 5,
            timeout_secs: 60,
            run_timeout_secs: None,
        }
    }
}

/// Data provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSection {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Zone selecting the raw SERP JSON capability
    pub serp_zone: String,
    /// Zone selecting the unlocked page fetch capability
    pub unlocker_zone: String,
    /// Search engine results endpoint wrapped into SERP requests
    pub search_engine_url: String,
    /// Scraped pages are cut to this many characters
    pub max_page_chars: usize,
}

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            base_url: crate::gateway::DEFAULT_PROVIDER_BASE_URL.to_string(),
            timeout_secs: 60,
            serp_zone: "serp_api1".to_string(),
            unlocker_zone: "web_unlocker1".to_string(),
            search_engine_url: "https://www.google.com/search".to_string(),
            max_page_chars: crate::tools::builtin::web_scrape::DEFAULT_MAX_PAGE_CHARS,
        }
    }
}

/// Where secrets are looked up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CredentialsSection {
    /// Secrets file consulted before the environment; skipped if missing
    pub secrets_file: Option<PathBuf>,
    /// Environment variable (and secrets file key) holding the LLM API key
    pub llm_api_key_env: String,
    /// Environment variable (and secrets file key) holding the provider API key
    pub provider_api_key_env: String,
}

impl Default for CredentialsSection {
    fn default() -> Self {
        Self {
            secrets_file: Some(PathBuf::from("secrets.toml")),
            llm_api_key_env: "OPENAI_API_KEY".to_string(),
            provider_api_key_env: "BRIGHTDATA_API_KEY".to_string(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to read secrets file {path}: {message}")]
    SecretsFile { path: PathBuf, message: String },
    #[error("Missing {name}: set {env_var} in the secrets file or environment")]
    MissingCredential { name: String, env_var: String },
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.provider != "openai" {
            return Err(ConfigError::InvalidConfig(format!(
                "Unsupported LLM provider: {}",
                self.llm.provider
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(invalid("llm.model must not be empty"));
        }
        if self.llm.max_iterations == 0 {
            return Err(invalid("llm.max_iterations must be at least 1"));
        }
        if let Some(temperature) = self.llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(invalid("llm.temperature must be between 0.0 and 2.0"));
            }
        }
        if self.provider.serp_zone.trim().is_empty() {
            return Err(invalid("provider.serp_zone must not be empty"));
        }
        if self.provider.unlocker_zone.trim().is_empty() {
            return Err(invalid("provider.unlocker_zone must not be empty"));
        }
        if self.provider.max_page_chars == 0 {
            return Err(invalid("provider.max_page_chars must be at least 1"));
        }
        url::Url::parse(&self.provider.search_engine_url).map_err(|e| {
            ConfigError::InvalidConfig(format!("provider.search_engine_url is invalid: {e}"))
        })?;
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::InvalidConfig(message.to_string())
}
