//! Startup wiring: config and credentials in, ready agent out
//!
//! All construction lives here so the loop itself only sees injected
//! dependencies.

use crate::agent::{AgentSettings, QueryAgent};
use crate::config::{AppConfig, ConfigError, LlmSection, ProviderSection};
use crate::credentials::Credentials;
use crate::error::AgentResult;
use crate::gateway::{GatewayConfig, ProviderGateway};
use crate::llm::{LlmProvider, OpenAiConfig, OpenAiProvider};
use crate::tools::{builtin, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the shared gateway and the fixed search/scrape registry
pub fn build_tool_registry(
    provider: &ProviderSection,
    provider_api_key: &str,
) -> AgentResult<Arc<ToolRegistry>> {
    let gateway = ProviderGateway::new(GatewayConfig {
        api_key: provider_api_key.to_string(),
        base_url: provider.base_url.clone(),
        timeout: Duration::from_secs(provider.timeout_secs),
    })?;

    let tools = builtin::web_tools(Arc::new(gateway), provider)?;
    let registry = ToolRegistry::from_tools(tools)?;
    info!(tools = registry.len(), "Tool registry ready");
    Ok(Arc::new(registry))
}

/// Create the configured LLM provider
pub fn build_llm_provider(
    llm: &LlmSection,
    llm_api_key: &str,
) -> AgentResult<Box<dyn LlmProvider>> {
    match llm.provider.as_str() {
        "openai" => {
            let mut config = OpenAiConfig {
                api_key: llm_api_key.to_string(),
                timeout: Duration::from_secs(llm.timeout_secs),
                ..Default::default()
            };
            if let Some(base_url) = &llm.base_url {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
            Ok(Box::new(OpenAiProvider::new(config)?))
        }
        other => Err(ConfigError::InvalidConfig(format!("Unsupported LLM provider: {other}")).into()),
    }
}

/// Build a ready-to-run agent
pub fn build_agent(config: &AppConfig, credentials: &Credentials) -> AgentResult<QueryAgent> {
    let tools = build_tool_registry(&config.provider, &credentials.provider_api_key)?;
    let llm = build_llm_provider(&config.llm, &credentials.llm_api_key)?;
    Ok(QueryAgent::new(llm, tools, AgentSettings::from(&config.llm)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use crate::gateway::GatewayError;

    fn credentials() -> Credentials {
        Credentials {
            llm_api_key: "sk-test".to_string(),
            provider_api_key: "bd-test".to_string(),
        }
    }

    #[test]
    fn test_build_agent_with_defaults() {
        let agent = build_agent(&AppConfig::default(), &credentials()).unwrap();
        assert_eq!(agent.settings().model, "gpt-4o-mini");
        assert_eq!(agent.settings().max_iterations, 5);
    }

    #[test]
    fn test_registry_requires_provider_key() {
        let result = build_tool_registry(&ProviderSection::default(), "");
        assert!(matches!(
            result,
            Err(AgentError::Gateway(GatewayError::NotConfigured(_)))
        ));
    }

    #[test]
    fn test_unsupported_llm_provider() {
        let llm = LlmSection {
            provider: "mystery".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            build_llm_provider(&llm, "sk-test"),
            Err(AgentError::Config(ConfigError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_llm_provider_requires_key() {
        assert!(matches!(
            build_llm_provider(&LlmSection::default(), ""),
            Err(AgentError::Llm(_))
        ));
    }
}
