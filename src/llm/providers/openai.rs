//! OpenAI provider implementation
//!
//! Chat completions with function tools. One HTTP call per completion; the
//! agent loop owns any decision to try again.

use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, Message,
    MessageRole, TokenUsage, ToolCall,
};
use crate::tools::ToolDescription;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

/// OpenAI provider configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// OpenAI provider implementation
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "OpenAI API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Convert a completion request to OpenAI format (pure function)
    fn convert_request(request: &CompletionRequest) -> OpenAiCompletionRequest {
        let tools: Vec<OpenAiTool> = request.tools.iter().map(Self::convert_tool).collect();

        OpenAiCompletionRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(Self::convert_message).collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: if tools.is_empty() { None } else { Some(tools) },
        }
    }

    /// Convert an internal message to OpenAI format (pure function)
    fn convert_message(message: &Message) -> OpenAiMessage {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        };

        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(
                message
                    .tool_calls
                    .iter()
                    .map(|call| OpenAiToolCall {
                        id: call.id.clone(),
                        call_type: "function".to_string(),
                        function: OpenAiFunctionCall {
                            name: call.name.clone(),
                            arguments: Self::encode_arguments(&call.arguments),
                        },
                    })
                    .collect(),
            )
        };

        OpenAiMessage {
            role: role.to_string(),
            content: message.content.clone(),
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        }
    }

    /// Convert a tool description to an OpenAI function tool (pure function)
    fn convert_tool(tool: &ToolDescription) -> OpenAiTool {
        OpenAiTool {
            tool_type: "function".to_string(),
            function: OpenAiFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.json_schema(),
            },
        }
    }

    /// Parse an OpenAI completion response (pure function)
    fn parse_completion_response(
        response: OpenAiCompletionResponse,
    ) -> Result<CompletionResponse, LlmError> {
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            LlmError::InvalidResponse("No choices returned from OpenAI".to_string())
        })?;

        let tool_calls = choice
            .message
            .tool_calls
            .as_deref()
            .map(Self::extract_tool_calls)
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content,
            model: response.model,
            usage: response
                .usage
                .map(|u| TokenUsage {
                    prompt_tokens: u.prompt_tokens,
                    completion_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default(),
            finish_reason: Self::convert_finish_reason(choice.finish_reason.as_deref()),
            tool_calls,
        })
    }

    /// Extract tool calls; arguments arrive as a JSON-encoded string (pure function).
    /// Arguments that do not parse are kept as the raw string so the registry
    /// rejects them and the model sees the failure.
    fn extract_tool_calls(calls: &[OpenAiToolCall]) -> Vec<ToolCall> {
        calls
            .iter()
            .map(|call| {
                let arguments = serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                    warn!(
                        tool = %call.function.name,
                        error = %e,
                        "Tool call arguments are not valid JSON"
                    );
                    serde_json::Value::String(call.function.arguments.clone())
                });
                ToolCall {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments,
                }
            })
            .collect()
    }

    /// Encode arguments for the wire; raw strings go back verbatim (pure function)
    fn encode_arguments(arguments: &serde_json::Value) -> String {
        match arguments {
            serde_json::Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }
    }

    /// Convert OpenAI finish reason to internal format (pure function)
    fn convert_finish_reason(reason: Option<&str>) -> FinishReason {
        match reason {
            Some("stop") => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("tool_calls") => FinishReason::ToolCalls,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Other,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let openai_request = Self::convert_request(&request);
        debug!(
            model = %openai_request.model,
            messages = openai_request.messages.len(),
            tools = request.tools.len(),
            "OpenAI request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                warn!("OpenAI network error: {}", e);
                LlmError::NetworkError(format!(
                    "HTTP request failed: {e} (is_connect: {}, is_timeout: {})",
                    e.is_connect(),
                    e.is_timeout()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "OpenAI API error: {}", body);
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let openai_response: OpenAiCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let completion = Self::parse_completion_response(openai_response)?;
        debug!(
            total_tokens = completion.usage.total_tokens,
            finish_reason = ?completion.finish_reason,
            tool_calls = completion.tool_calls.len(),
            "OpenAI response"
        );
        Ok(completion)
    }
}

#[derive(Debug, Serialize)]
struct OpenAiCompletionRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiCompletionResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAiFunction,
}

#[derive(Debug, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolParameter;
    use serde_json::json;

    #[test]
    fn test_openai_config_default() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_openai_provider_creation_without_api_key() {
        let result = OpenAiProvider::new(OpenAiConfig::default());
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }

    #[test]
    fn test_openai_provider_name() {
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_convert_tool_message() {
        let message = Message::tool_result("call_9", "42");
        let converted = OpenAiProvider::convert_message(&message);

        assert_eq!(converted.role, "tool");
        assert_eq!(converted.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(converted.content.as_deref(), Some("42"));
    }

    #[test]
    fn test_convert_assistant_tool_calls_encodes_arguments() {
        let message = Message::assistant(
            None,
            vec![ToolCall {
                id: "call_1".to_string(),
                name: "search".to_string(),
                arguments: json!({"query": "rust"}),
            }],
        );

        let json = serde_json::to_value(OpenAiProvider::convert_message(&message)).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["tool_calls"][0]["type"], "function");
        assert_eq!(
            json["tool_calls"][0]["function"]["arguments"],
            "{\"query\":\"rust\"}"
        );
    }

    #[test]
    fn test_convert_request_with_tools() {
        let request = CompletionRequest {
            messages: vec![Message::user("Hi")],
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            temperature: Some(0.3),
            tools: vec![ToolDescription {
                name: "search".to_string(),
                description: "Search".to_string(),
                parameters: vec![ToolParameter::string("query", "Query")],
            }],
        };

        let json = serde_json::to_value(OpenAiProvider::convert_request(&request)).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["tools"][0]["function"]["name"], "search");
        assert_eq!(
            json["tools"][0]["function"]["parameters"]["required"],
            json!(["query"])
        );
    }

    #[test]
    fn test_convert_request_without_tools_omits_field() {
        let request = CompletionRequest {
            messages: vec![Message::user("Hi")],
            model: "gpt-4o-mini".to_string(),
            max_tokens: Some(10),
            temperature: None,
            tools: Vec::new(),
        };

        let json = serde_json::to_value(OpenAiProvider::convert_request(&request)).unwrap();
        assert!(json.get("tools").is_none());
        assert_eq!(json["max_tokens"], 10);
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let response: OpenAiCompletionResponse = serde_json::from_value(json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "search", "arguments": "{\"query\":\"paris\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        let parsed = OpenAiProvider::parse_completion_response(response).unwrap();
        assert_eq!(parsed.finish_reason, FinishReason::ToolCalls);
        assert_eq!(parsed.tool_calls.len(), 1);
        assert_eq!(parsed.tool_calls[0].arguments, json!({"query": "paris"}));
        assert_eq!(parsed.usage, TokenUsage::default());
    }

    #[test]
    fn test_parse_response_keeps_malformed_arguments_raw() {
        let response: OpenAiCompletionResponse = serde_json::from_value(json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "search", "arguments": "{oops"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        let parsed = OpenAiProvider::parse_completion_response(response).unwrap();
        assert_eq!(parsed.tool_calls.len(), 1);
        assert_eq!(parsed.tool_calls[0].name, "search");
        assert_eq!(parsed.tool_calls[0].arguments, json!("{oops"));
    }

    #[test]
    fn test_raw_arguments_echoed_verbatim() {
        let message = Message::assistant(
            None,
            vec![ToolCall {
                id: "call_1".to_string(),
                name: "search".to_string(),
                arguments: json!("{\"query\": \"par"),
            }],
        );

        let json = serde_json::to_value(OpenAiProvider::convert_message(&message)).unwrap();
        assert_eq!(
            json["tool_calls"][0]["function"]["arguments"],
            "{\"query\": \"par"
        );
    }

    #[test]
    fn test_parse_response_without_choices() {
        let response: OpenAiCompletionResponse =
            serde_json::from_value(json!({"model": "gpt-4o-mini", "choices": []})).unwrap();

        assert!(OpenAiProvider::parse_completion_response(response).is_err());
    }

    #[test]
    fn test_finish_reason_conversion() {
        assert_eq!(
            OpenAiProvider::convert_finish_reason(Some("stop")),
            FinishReason::Stop
        );
        assert_eq!(
            OpenAiProvider::convert_finish_reason(Some("length")),
            FinishReason::Length
        );
        assert_eq!(
            OpenAiProvider::convert_finish_reason(None),
            FinishReason::Other
        );
    }
}
