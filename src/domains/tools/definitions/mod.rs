//! Builtin tool definitions.
//!
//! Each tool lives in its own file and implements
//! [`ToolHandler`](super::handlers::ToolHandler).
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file (e.g., `my_tool.rs`)
//! 2. Implement `ToolHandler` (describe + execute)
//! 3. Export it here and append it to `builtin_tools()`

pub mod code_counter;
pub mod countdown;
pub mod ping;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

pub use code_counter::CodeCounterTool;
pub use countdown::CountdownTool;
pub use ping::PingTool;

use super::handlers::ToolHandler;

/// The builtin registration table, in registration order.
pub fn builtin_tools() -> Vec<Arc<dyn ToolHandler>> {
    vec![
        Arc::new(PingTool),
        Arc::new(CodeCounterTool),
        Arc::new(CountdownTool),
    ]
}
