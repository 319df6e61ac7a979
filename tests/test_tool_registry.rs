//! Tool registry behavior
//!
//! Registration, lookup, listing and argument validation through the public
//! API, using the static test tool from `search_agent::testing`.

use search_agent::testing::StaticTool;
use search_agent::tools::{ToolError, ToolRegistry};
use serde_json::json;

#[test]
fn test_two_distinct_tools_are_listed() {
    let registry = ToolRegistry::from_tools(vec![
        StaticTool::boxed("search", "query", json!([])),
        StaticTool::boxed("scrape", "url", json!("")),
    ])
    .unwrap();

    let descriptors = registry.list();
    assert_eq!(descriptors.len(), 2);
    assert!(descriptors.iter().any(|d| d.name == "search"));
    assert!(descriptors.iter().any(|d| d.name == "scrape"));
}

#[test]
fn test_lookup_registered_and_unregistered() {
    let mut registry = ToolRegistry::new();
    registry
        .register(StaticTool::boxed("search", "query", json!([])))
        .unwrap();

    assert_eq!(registry.lookup("search").unwrap().describe().name, "search");

    let error = registry.lookup("scrape").err().unwrap();
    assert!(matches!(error, ToolError::UnknownTool(ref name) if name == "scrape"));
    assert_eq!(error.to_string(), "Tool not found: scrape");
}

#[test]
fn test_duplicate_name_rejected_and_registry_unchanged() {
    let mut registry = ToolRegistry::new();
    registry
        .register(StaticTool::boxed("search", "query", json!("first")))
        .unwrap();

    let result = registry.register(StaticTool::boxed("search", "q", json!("second")));

    assert!(matches!(result, Err(ToolError::DuplicateTool(_))));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.list()[0].parameters[0].name, "query");
}

#[test]
fn test_descriptor_schema_matches_parameters() {
    let registry =
        ToolRegistry::from_tools(vec![StaticTool::boxed("scrape", "url", json!(""))]).unwrap();

    let descriptor = &registry.list()[0];
    let schema = descriptor.json_schema();

    assert_eq!(descriptor.parameters.len(), 1);
    assert_eq!(schema["properties"]["url"]["type"], "string");
    assert_eq!(schema["required"], json!(["url"]));
}

#[tokio::test]
async fn test_execute_returns_tool_output() {
    let registry =
        ToolRegistry::from_tools(vec![StaticTool::boxed("search", "query", json!(["a"]))])
            .unwrap();

    let result = registry
        .execute("search", &json!({"query": "rust"}))
        .await
        .unwrap();
    assert_eq!(result, json!(["a"]));
}

#[tokio::test]
async fn test_execute_rejects_wrong_argument_type() {
    let registry =
        ToolRegistry::from_tools(vec![StaticTool::boxed("search", "query", json!([]))]).unwrap();

    let result = registry.execute("search", &json!({"query": 42})).await;
    assert!(matches!(result, Err(ToolError::ValidationError(_))));
}

#[test]
fn test_builtin_descriptors_need_no_credentials() {
    let provider = search_agent::config::ProviderSection::default();
    let descriptors = search_agent::tools::builtin::web_tool_descriptions(&provider);

    let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["search", "scrape"]);
    assert_eq!(descriptors[0].parameters[0].name, "query");
    assert_eq!(descriptors[1].parameters[0].name, "url");
    assert!(descriptors[1].description.contains("50000"));
}
