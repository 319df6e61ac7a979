//! Credential loading
//!
//! Secrets are resolved through an ordered chain of sources. The first
//! non-empty value wins; running out of sources is a configuration error
//! naming the missing secret.

use crate::config::{ConfigError, CredentialsSection};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The two secrets the agent needs
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub llm_api_key: String,
    pub provider_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &"***")
            .field("provider_api_key", &"***")
            .finish()
    }
}

/// A place a secret can come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// TOML file of `NAME = "value"` pairs; a missing file yields nothing
    File(PathBuf),
    /// Process environment
    Env,
}

impl CredentialSource {
    fn describe(&self) -> String {
        match self {
            CredentialSource::File(path) => format!("file {}", path.display()),
            CredentialSource::Env => "environment".to_string(),
        }
    }
}

/// Ordered list of credential sources
#[derive(Debug, Clone)]
pub struct CredentialChain {
    sources: Vec<CredentialSource>,
    file_cache: HashMap<PathBuf, HashMap<String, String>>,
}

impl CredentialChain {
    pub fn new(sources: Vec<CredentialSource>) -> Self {
        Self {
            sources,
            file_cache: HashMap::new(),
        }
    }

    /// Secrets file first, then environment
    pub fn from_section(section: &CredentialsSection) -> Self {
        let mut sources = Vec::new();
        if let Some(path) = &section.secrets_file {
            sources.push(CredentialSource::File(path.clone()));
        }
        sources.push(CredentialSource::Env);
        Self::new(sources)
    }

    pub fn sources(&self) -> &[CredentialSource] {
        &self.sources
    }

    /// Resolve one secret by key, trying each source in order
    pub fn resolve(&mut self, key: &str) -> Result<Option<String>, ConfigError> {
        for index in 0..self.sources.len() {
            let source = self.sources[index].clone();
            let value = match &source {
                CredentialSource::File(path) => self.read_file(path)?.get(key).cloned(),
                CredentialSource::Env => std::env::var(key).ok(),
            };

            if let Some(value) = non_empty(value) {
                debug!(key = key, source = %source.describe(), "Resolved credential");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Resolve a secret that must be present
    pub fn require(&mut self, key: &str, name: &str) -> Result<String, ConfigError> {
        self.resolve(key)?
            .ok_or_else(|| ConfigError::MissingCredential {
                name: name.to_string(),
                env_var: key.to_string(),
            })
    }

    /// Resolve both secrets named in the credentials section
    pub fn load(&mut self, section: &CredentialsSection) -> Result<Credentials, ConfigError> {
        let llm_api_key = self.require(&section.llm_api_key_env, "LLM API key")?;
        let provider_api_key = self.require(&section.provider_api_key_env, "provider API key")?;
        Ok(Credentials {
            llm_api_key,
            provider_api_key,
        })
    }

    fn read_file(&mut self, path: &Path) -> Result<&HashMap<String, String>, ConfigError> {
        if !self.file_cache.contains_key(path) {
            let secrets = parse_secrets_file(path)?;
            self.file_cache.insert(path.to_path_buf(), secrets);
        }
        Ok(&self.file_cache[path])
    }
}

/// Load both secrets from the configured chain
pub fn load_credentials(section: &CredentialsSection) -> Result<Credentials, ConfigError> {
    CredentialChain::from_section(section).load(section)
}

fn parse_secrets_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SecretsFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let table: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::SecretsFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(table
        .into_iter()
        .filter_map(|(key, value)| match value {
            toml::Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secrets_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_file_source_wins_over_env() {
        std::env::set_var("SEARCH_AGENT_UNIT_FILE_FIRST", "from-env");
        let file = secrets_file("SEARCH_AGENT_UNIT_FILE_FIRST = \"from-file\"\n");

        let mut chain = CredentialChain::new(vec![
            CredentialSource::File(file.path().to_path_buf()),
            CredentialSource::Env,
        ]);

        assert_eq!(
            chain.resolve("SEARCH_AGENT_UNIT_FILE_FIRST").unwrap(),
            Some("from-file".to_string())
        );
    }

    #[test]
    fn test_empty_file_value_falls_through() {
        std::env::set_var("SEARCH_AGENT_UNIT_BLANK", "from-env");
        let file = secrets_file("SEARCH_AGENT_UNIT_BLANK = \"  \"\n");

        let mut chain = CredentialChain::new(vec![
            CredentialSource::File(file.path().to_path_buf()),
            CredentialSource::Env,
        ]);

        assert_eq!(
            chain.resolve("SEARCH_AGENT_UNIT_BLANK").unwrap(),
            Some("from-env".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let mut chain = CredentialChain::new(vec![CredentialSource::File(PathBuf::from(
            "/nonexistent/search-agent/secrets.toml",
        ))]);

        assert_eq!(chain.resolve("ANYTHING").unwrap(), None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let file = secrets_file("this is = = not toml");
        let mut chain =
            CredentialChain::new(vec![CredentialSource::File(file.path().to_path_buf())]);

        assert!(matches!(
            chain.resolve("KEY"),
            Err(ConfigError::SecretsFile { .. })
        ));
    }

    #[test]
    fn test_require_names_missing_secret() {
        let mut chain = CredentialChain::new(vec![]);
        let error = chain
            .require("SEARCH_AGENT_UNIT_NEVER_SET", "LLM API key")
            .unwrap_err();

        match error {
            ConfigError::MissingCredential { name, env_var } => {
                assert_eq!(name, "LLM API key");
                assert_eq!(env_var, "SEARCH_AGENT_UNIT_NEVER_SET");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_section_orders_file_before_env() {
        let chain = CredentialChain::from_section(&CredentialsSection::default());
        assert_eq!(
            chain.sources(),
            &[
                CredentialSource::File(PathBuf::from("secrets.toml")),
                CredentialSource::Env
            ]
        );
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let credentials = Credentials {
            llm_api_key: "sk-secret".to_string(),
            provider_api_key: "bd-secret".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("bd-secret"));
    }
}
