//! Ping tool definition.
//!
//! Takes no parameters and answers "pong"; useful to check a connection.

use serde_json::Value;
use tracing::info;

use crate::domains::tools::args::ToolArgs;
use crate::domains::tools::handlers::ToolHandler;
use crate::domains::tools::schema::ToolDescription;

pub struct PingTool;

impl PingTool {
    pub const NAME: &'static str = "ping";

    pub const DESCRIPTION: &'static str = "Reply with 'pong' to check that the tool runner is alive.";
}

#[async_trait::async_trait]
impl ToolHandler for PingTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription::new(Self::NAME, Self::DESCRIPTION)
    }

    async fn execute(&self, _args: ToolArgs) -> anyhow::Result<Value> {
        info!("Ping tool called");
        Ok(Value::String("pong".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping() {
        assert!(PingTool.describe().parameters.is_empty());
        assert_eq!(PingTool.execute(ToolArgs::new()).await.unwrap(), "pong");
    }
}
