//! A configurable in-memory tool for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::domains::tools::args::ToolArgs;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::registry::ToolDescriptor;
use crate::domains::tools::schema::{Schema, ToolDescription};

#[derive(Clone)]
enum Behavior {
    Reply(Value),
    Echo,
    Fail(String),
    Panic,
}

#[derive(Clone)]
pub(crate) struct StaticTool {
    name: String,
    description: String,
    schema: Schema,
    behavior: Behavior,
    describe_calls: Arc<AtomicUsize>,
}

impl StaticTool {
    pub(crate) fn new(name: &str, schema: Schema) -> Self {
        Self {
            name: name.to_string(),
            description: format!("The {name} tool"),
            schema,
            behavior: Behavior::Reply(Value::String("ok".to_string())),
            describe_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub(crate) fn replying(mut self, value: Value) -> Self {
        self.behavior = Behavior::Reply(value);
        self
    }

    /// Reply with the typed arguments as a JSON object.
    pub(crate) fn echoing(mut self) -> Self {
        self.behavior = Behavior::Echo;
        self
    }

    pub(crate) fn failing(mut self, message: &str) -> Self {
        self.behavior = Behavior::Fail(message.to_string());
        self
    }

    pub(crate) fn panicking(mut self) -> Self {
        self.behavior = Behavior::Panic;
        self
    }

    pub(crate) fn describe_calls(&self) -> Arc<AtomicUsize> {
        self.describe_calls.clone()
    }

    pub(crate) fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor::new(Arc::new(self))
    }
}

#[async_trait::async_trait]
impl ToolHandler for StaticTool {
    fn describe(&self) -> ToolDescription {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        ToolDescription::new(&self.name, &self.description).with_parameters(self.schema.clone())
    }

    async fn execute(&self, args: ToolArgs) -> anyhow::Result<Value> {
        match &self.behavior {
            Behavior::Reply(value) => Ok(value.clone()),
            Behavior::Echo => Ok(args.to_json()),
            Behavior::Fail(message) => Err(anyhow::anyhow!("{message}")),
            Behavior::Panic => panic!("{} blew up", self.name),
        }
    }
}
