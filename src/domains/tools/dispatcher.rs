//! Dispatch: resolve a tool by name, validate its arguments, run it.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, instrument};

use super::args::RawArgs;
use super::coercion::validate;
use super::error::ToolError;
use super::registry::ToolRegistry;

/// Stateless per call; cheap to clone.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run `name` with `raw` arguments.
    ///
    /// Validation errors are returned unchanged. Anything the tool itself
    /// raises, panics included, comes back as [`ToolError::Execution`].
    #[instrument(skip(self, raw), fields(tool = %name))]
    pub async fn dispatch(&self, name: &str, raw: RawArgs) -> Result<Value, ToolError> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::unknown_tool(name))?;

        let args = validate(&raw, descriptor.schema())?;
        debug!("Invoking with {} argument(s)", args.len());

        match AssertUnwindSafe(descriptor.invoke(args)).catch_unwind().await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(cause)) => Err(ToolError::execution(name, cause)),
            Err(panic) => Err(ToolError::execution(
                name,
                anyhow::anyhow!("tool panicked: {}", panic_message(panic.as_ref())),
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
