//! Tool system exposed to the agent loop
//!
//! Each tool is an explicit value implementing [`Tool`]. The registry is
//! built once at startup from a fixed list of tools and is read-only after
//! that, so it can be shared behind an `Arc` without locking.

use crate::gateway::GatewayError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use thiserror::Error;

pub mod builtin;

/// A named, schema-described callable the agent loop may invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and parameter schema
    fn describe(&self) -> ToolDescription;

    /// Run the tool with arguments matching the schema from `describe()`
    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError>;
}

/// A single tool parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolParameter {
    pub name: String,
    /// JSON Schema type name, e.g. "string"
    pub kind: String,
    pub description: String,
}

impl ToolParameter {
    pub fn string(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: "string".to_string(),
            description: description.to_string(),
        }
    }
}

/// Tool descriptor handed to the LLM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDescription {
    /// Render the parameters as a JSON Schema object.
    /// Every parameter is required and extra properties are rejected.
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind,
                    "description": param.description,
                }),
            );
        }

        let required: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }
}

/// Immutable name -> tool mapping
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a fixed set of tools
    pub fn from_tools<I>(tools: I) -> Result<Self, ToolError>
    where
        I: IntoIterator<Item = Box<dyn Tool>>,
    {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool; names must be unique
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.describe().name;
        if self.index.contains_key(&name) {
            return Err(ToolError::DuplicateTool(name));
        }

        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Find a tool by name
    pub fn lookup(&self, name: &str) -> Result<&dyn Tool, ToolError> {
        self.index
            .get(name)
            .map(|&i| self.tools[i].as_ref())
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    /// Descriptors for every registered tool, in registration order
    pub fn list(&self) -> Vec<ToolDescription> {
        self.tools.iter().map(|tool| tool.describe()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate arguments against the tool's schema, then execute it
    pub async fn execute(&self, name: &str, parameters: &Value) -> Result<Value, ToolError> {
        let tool = self.lookup(name)?;
        Self::validate_parameters(&tool.describe(), parameters)?;
        tool.execute(parameters).await
    }

    fn validate_parameters(
        description: &ToolDescription,
        parameters: &Value,
    ) -> Result<(), ToolError> {
        let schema = description.json_schema();
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| ToolError::SchemaError(format!("Schema compilation error: {e}")))?;

        validator.validate(parameters).map_err(|errors| {
            let error_messages: Vec<String> = errors
                .map(|e| format!("At '{}': {}", e.instance_path, e))
                .collect();
            ToolError::ValidationError(error_messages.join("; "))
        })
    }
}

/// Tool system errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    UnknownTool(String),
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
    #[error("Parameter validation failed: {0}")]
    ValidationError(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Failed to encode tool result: {0}")]
    ResultEncoding(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ToolError {
    /// Underlying gateway error, if the tool failed talking to the provider
    pub fn gateway_error(&self) -> Option<&GatewayError> {
        match self {
            ToolError::Gateway(e) => Some(e),
            _ => None,
        }
    }
}
