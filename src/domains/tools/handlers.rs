//! The plugin contract.
//!
//! Anything that can describe itself and execute with typed arguments is a
//! tool: builtins implement [`ToolHandler`] directly, out-of-process plugins
//! through [`ExternalTool`](super::external::ExternalTool).

use serde_json::Value;

use super::args::ToolArgs;
use super::schema::ToolDescription;

/// A tool that can be registered and dispatched.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name, description and parameter schema. Called once, at registration.
    fn describe(&self) -> ToolDescription;

    /// Run the tool. `args` only holds keys the caller supplied, already
    /// coerced to their declared types.
    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value>;
}

/// Text form of a tool result: strings as-is, anything else as JSON.
pub fn render_output(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
