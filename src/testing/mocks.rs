//! Mock implementations for testing
//!
//! A scripted LLM provider and a fixed-output tool, so the agent loop can be
//! exercised without network access.

use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, TokenUsage,
    ToolCall,
};
use crate::tools::{Tool, ToolDescription, ToolError, ToolParameter};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// LLM provider that replays scripted responses and records requests
#[derive(Clone, Default)]
pub struct MockLlmProvider {
    responses: Arc<Mutex<VecDeque<CompletionResponse>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Option<Duration>,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Default::default()
        }
    }

    /// Sleep before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .ok_or_else(|| LlmError::InvalidResponse("no scripted response left".to_string()))
    }
}

/// Final-answer completion
pub fn text_response(content: &str) -> CompletionResponse {
    CompletionResponse {
        content: Some(content.to_string()),
        model: "mock-model".to_string(),
        usage: TokenUsage::default(),
        finish_reason: FinishReason::Stop,
        tool_calls: Vec::new(),
    }
}

/// Completion requesting a single tool call
pub fn tool_call_response(id: &str, name: &str, arguments: Value) -> CompletionResponse {
    CompletionResponse {
        content: None,
        model: "mock-model".to_string(),
        usage: TokenUsage::default(),
        finish_reason: FinishReason::ToolCalls,
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }],
    }
}

/// Tool with one string parameter that always returns the same value
pub struct StaticTool {
    name: String,
    parameter: String,
    output: Value,
}

impl StaticTool {
    pub fn boxed(name: &str, parameter: &str, output: Value) -> Box<dyn Tool> {
        Box::new(Self {
            name: name.to_string(),
            parameter: parameter.to_string(),
            output,
        })
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: self.name.clone(),
            description: format!("Static test tool {}", self.name),
            parameters: vec![ToolParameter::string(&self.parameter, "Test input")],
        }
    }

    async fn execute(&self, _parameters: &Value) -> Result<Value, ToolError> {
        Ok(self.output.clone())
    }
}
