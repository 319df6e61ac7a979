//! Bounded tool-calling loop for a single query
//!
//! Each iteration asks the model for one completion. Tool calls are run in
//! order through the registry and their results appended as `tool`
//! messages; a completion without tool calls is the final answer.

use crate::config::LlmSection;
use crate::error::{sanitize_error_message, AgentError, AgentResult};
use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider, Message, ToolCall};
use crate::tools::{ToolDescription, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Per-run settings for the agent loop
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub system_prompt: String,
    pub model: String,
    pub max_iterations: usize,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub run_timeout: Option<Duration>,
}

impl From<&LlmSection> for AgentSettings {
    fn from(llm: &LlmSection) -> Self {
        Self {
            system_prompt: llm.system_prompt.clone(),
            model: llm.model.clone(),
            max_iterations: llm.max_iterations,
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            run_timeout: llm.run_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Drives an LLM provider against a fixed tool registry
pub struct QueryAgent {
    llm: Box<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    settings: AgentSettings,
}

impl QueryAgent {
    pub fn new(llm: Box<dyn LlmProvider>, tools: Arc<ToolRegistry>, settings: AgentSettings) -> Self {
        Self {
            llm,
            tools,
            settings,
        }
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Answer one query, honoring the optional run deadline
    pub async fn run(&self, query: &str) -> AgentResult<String> {
        if query.trim().is_empty() {
            return Err(AgentError::invalid_input("query must not be empty"));
        }

        let run_id = Uuid::new_v4();
        let span = crate::run_span!(run_id = %run_id, model = %self.settings.model);

        let run = self.run_loop(query).instrument(span);
        match self.settings.run_timeout {
            Some(deadline) => tokio::time::timeout(deadline, run)
                .await
                .map_err(|_| AgentError::Timeout {
                    secs: deadline.as_secs(),
                })?,
            None => run.await,
        }
    }

    async fn run_loop(&self, query: &str) -> AgentResult<String> {
        let available_tools = self.tools.list();
        let mut messages = self.build_initial_messages(query);

        for iteration in 1..=self.settings.max_iterations {
            let request = self.create_completion_request(messages.clone(), &available_tools);
            let response = self.llm.complete(request).await?;

            if !Self::should_continue_tool_loop(&response) {
                info!(iterations = iteration, "Agent run completed");
                return Ok(Self::extract_final_content(response));
            }

            debug!(
                iteration = iteration,
                tool_count = response.tool_calls.len(),
                "Processing tool calls"
            );

            messages.push(Message::assistant(
                response.content.clone(),
                response.tool_calls.clone(),
            ));
            for tool_call in &response.tool_calls {
                let result = self.execute_tool_call(tool_call).await;
                messages.push(Message::tool_result(&tool_call.id, result));
            }
        }

        warn!(
            max_iterations = self.settings.max_iterations,
            "Agent stopped at iteration limit"
        );
        Err(AgentError::IterationLimitExceeded {
            max: self.settings.max_iterations,
        })
    }

    /// System prompt with the current date, then the query
    fn build_initial_messages(&self, query: &str) -> Vec<Message> {
        let now = chrono::Utc::now();
        let system_prompt = format!(
            "{}\n\nCurrent date and time: {} UTC",
            self.settings.system_prompt,
            now.format("%Y-%m-%d %H:%M:%S")
        );

        vec![Message::system(system_prompt), Message::user(query)]
    }

    fn create_completion_request(
        &self,
        messages: Vec<Message>,
        available_tools: &[ToolDescription],
    ) -> CompletionRequest {
        CompletionRequest {
            messages,
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            tools: available_tools.to_vec(),
        }
    }

    /// Run one tool call; failures become text for the model
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> String {
        let span = crate::tool_span!(tool = %tool_call.name, call_id = %tool_call.id);
        debug!(parent: &span, arguments = %tool_call.arguments, "Executing tool");

        match self
            .tools
            .execute(&tool_call.name, &tool_call.arguments)
            .instrument(span.clone())
            .await
        {
            Ok(value) => match value {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            },
            Err(e) => {
                warn!(parent: &span, error = %e, "Tool call failed");
                format!(
                    "Tool {} failed: {}",
                    tool_call.name,
                    sanitize_error_message(&e.to_string())
                )
            }
        }
    }

    fn should_continue_tool_loop(response: &CompletionResponse) -> bool {
        !response.tool_calls.is_empty()
    }

    fn extract_final_content(response: CompletionResponse) -> String {
        response.content.unwrap_or_default()
    }
}
