//! Top-level error type for the search agent
//!
//! Each layer has its own `thiserror` enum; `AgentError` wraps them so the
//! binary can report any failure with one type.

use std::sync::OnceLock;
use thiserror::Error;

/// Maximum length of an error message fed back to the model
const MAX_SANITIZED_LEN: usize = 500;

/// Main error type for agent runs
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Tool error: {0}")]
    Tool(#[from] crate::tools::ToolError),

    #[error("Provider gateway error: {0}")]
    Gateway(#[from] crate::gateway::GatewayError),

    #[error("LLM provider error: {0}")]
    Llm(#[from] crate::llm::LlmError),

    #[error("Agent exceeded maximum iterations ({max})")]
    IterationLimitExceeded { max: usize },

    #[error("Agent run timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl AgentError {
    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this failure happened before any run could start
    pub fn is_startup_error(&self) -> bool {
        matches!(self, AgentError::Config(_) | AgentError::Gateway(_))
    }
}

fn secret_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"(?i)\b(password|token|api[_-]?key|key|secret|bearer)\b([=:]\s*|\s+)[A-Za-z0-9._\-]{6,}")
            .expect("secret pattern is valid")
    })
}

/// Redact secret-looking values and cap the length of an error message.
/// The cap respects UTF-8 character boundaries.
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = secret_pattern()
        .replace_all(message, "${1}=***")
        .to_string();

    if sanitized.len() > MAX_SANITIZED_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_SANITIZED_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}

/// Result type for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
