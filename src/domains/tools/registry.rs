//! Tool Registry - the process-wide map from tool name to descriptor.
//!
//! The registry is filled once by discovery and shared read-only (behind an
//! `Arc`) by the CLI front-end, the dispatcher and the RPC server.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Value, json};
use tracing::debug;

use super::args::ToolArgs;
use super::handlers::ToolHandler;
use super::schema::{Schema, ToolDescription};

// ============================================================================
// Tool Descriptor
// ============================================================================

/// A registered tool: its self-description plus the handler that runs it.
#[derive(Clone)]
pub struct ToolDescriptor {
    description: ToolDescription,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    /// Describe the handler once and keep the result.
    pub fn new(handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            description: handler.describe(),
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.description.name
    }

    pub fn description(&self) -> &str {
        &self.description.description
    }

    pub fn schema(&self) -> &Schema {
        &self.description.parameters
    }

    /// Run the handler with already validated arguments.
    pub async fn invoke(&self, args: ToolArgs) -> anyhow::Result<Value> {
        self.handler.execute(args).await
    }

    /// Entry for a `tools/list` response.
    pub fn to_tool_json(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "inputSchema": self.schema().to_input_schema(),
        })
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.description.name)
            .field("parameters", &self.description.parameters.len())
            .finish()
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - name to descriptor, in first-registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. A tool with the same name is replaced and
    /// returned: the last registration wins.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Option<ToolDescriptor> {
        let replaced = self.tools.insert(descriptor.name().to_string(), descriptor);
        if let Some(old) = &replaced {
            debug!("Tool '{}' replaced by a later registration", old.name());
        }
        replaced
    }

    /// Describe and register a handler.
    pub fn register_handler(&mut self, handler: Arc<dyn ToolHandler>) -> Option<ToolDescriptor> {
        self.register(ToolDescriptor::new(handler))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    /// All tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Every tool as a `tools/list` entry.
    pub fn list_tools(&self) -> Vec<Value> {
        self.descriptors().map(ToolDescriptor::to_tool_json).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::StaticTool;
    use crate::domains::tools::schema::{ParamSpec, ParamType};

    #[test]
    fn test_distinct_names_are_all_reachable() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("alpha", Schema::new()).descriptor());
        registry.register(StaticTool::new("beta", Schema::new()).descriptor());

        assert_eq!(registry.len(), 2);
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("beta").is_some());
        assert_eq!(registry.tool_names(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(StaticTool::new("dup", Schema::new()).with_description("first").descriptor());
        let replaced = registry.register(
            StaticTool::new("dup", Schema::new())
                .with_description("second")
                .descriptor(),
        );

        assert_eq!(replaced.map(|d| d.description().to_string()), Some("first".into()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("dup").unwrap().description(), "second");
    }

    #[test]
    fn test_describe_is_called_once() {
        let tool = StaticTool::new("once", Schema::new());
        let counter = tool.describe_calls();
        let descriptor = tool.descriptor();
        let _ = descriptor.name();
        let _ = descriptor.schema();
        let _ = descriptor.to_tool_json();
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_list_tools() {
        let mut registry = ToolRegistry::new();
        registry.register(
            StaticTool::new(
                "greet",
                Schema::new().param("who", ParamSpec::required(ParamType::String, "Who to greet")),
            )
            .descriptor(),
        );

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "greet");
        assert_eq!(tools[0]["inputSchema"]["required"][0], "who");
    }

    #[test]
    fn test_unknown_lookup() {
        assert!(ToolRegistry::new().get("missing").is_none());
        assert!(ToolRegistry::new().is_empty());
    }
}
