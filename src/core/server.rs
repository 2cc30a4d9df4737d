//! Protocol server: maps JSON-RPC requests onto the tool registry.
//!
//! The server is transport-agnostic. A transport hands it one input line at
//! a time and writes back whatever response it returns. Nothing that happens
//! while handling a line is fatal to the caller.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

use super::config::Config;
use super::transport::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::domains::tools::{Dispatcher, RawArgs, ToolError, ToolRegistry, render_output};

/// Protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// The JSON-RPC front-end of the tool registry.
#[derive(Debug, Clone)]
pub struct ToolServer {
    /// Runner configuration.
    config: Arc<Config>,

    /// Dispatcher over the registry built at startup.
    dispatcher: Dispatcher,
}

impl ToolServer {
    /// Create a server over an already discovered registry.
    pub fn new(config: Arc<Config>, registry: ToolRegistry) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(Arc::new(registry)),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the runner configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Tool entries for `tools/list`, in registration order.
    pub fn list_tools(&self) -> Vec<Value> {
        self.dispatcher.registry().list_tools()
    }

    /// Call a tool by name with raw (uncoerced) arguments.
    pub async fn call_tool(&self, name: &str, arguments: RawArgs) -> Result<Value, ToolError> {
        self.dispatcher.dispatch(name, arguments).await
    }

    /// Handle one input line. Returns `None` when no response must be
    /// written: malformed JSON and notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Dropping malformed request line: {}", e);
                return None;
            }
        };

        self.handle_request(request).await
    }

    /// Process a parsed request.
    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!("Received notification: {}", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => {
                warn!("Unknown method: {}", request.method);
                JsonRpcResponse::method_not_found(request.id, &request.method)
            }
        };

        Some(response)
    }

    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("Processing initialize request");

        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.name(),
                "version": self.version()
            }
        });

        JsonRpcResponse::success(request.id, result)
    }

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Processing tools/list request");
        JsonRpcResponse::success(request.id, json!({ "tools": self.list_tools() }))
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params = request.params.unwrap_or(Value::Null);

        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
        };

        let arguments: RawArgs = match params.get("arguments") {
            None | Some(Value::Null) => RawArgs::new(),
            Some(Value::Object(map)) => map.clone().into_iter().collect(),
            Some(_) => {
                return JsonRpcResponse::invalid_params(request.id, "Arguments must be an object");
            }
        };

        match self.call_tool(name, arguments).await {
            Ok(result) => JsonRpcResponse::success(
                request.id,
                json!({
                    "content": [{ "type": "text", "text": render_output(&result) }]
                }),
            ),
            Err(e) => {
                if e.is_usage_error() {
                    warn!("Call to '{}' rejected: {}", name, e);
                } else {
                    error!("Call to '{}' failed: {}", name, e);
                }
                JsonRpcResponse::tool_failure(request.id, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::StaticTool;
    use crate::domains::tools::{ParamSpec, ParamType, Schema};

    fn server() -> ToolServer {
        let mut registry = ToolRegistry::new();
        registry.register(
            StaticTool::new(
                "echo",
                Schema::new()
                    .param("text", ParamSpec::required(ParamType::String, "Text to echo"))
                    .param("times", ParamSpec::optional(ParamType::Int, "Repetitions")),
            )
            .with_description("Echo the arguments")
            .echoing()
            .descriptor(),
        );
        registry.register(
            StaticTool::new("broken", Schema::new())
                .failing("disk on fire")
                .descriptor(),
        );
        ToolServer::new(Arc::new(Config::default()), registry)
    }

    async fn call(server: &ToolServer, line: &str) -> Value {
        let response = server.handle_line(line).await.expect("a response");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_tools_list_schema() {
        let server = server();
        let response = call(&server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;

        assert_eq!(response["id"], json!(1));
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0]["name"], "echo");
        assert_eq!(tools[0]["description"], "Echo the arguments");
        let schema = &tools[0]["inputSchema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["text"]["type"], "string");
        assert_eq!(schema["properties"]["times"]["type"], "int");
        assert_eq!(schema["required"], json!(["text"]));
    }

    #[tokio::test]
    async fn test_tools_call_success_is_wrapped_as_text() {
        let server = server();
        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"echo","arguments":{"text":"hi","times":"3"}}}"#,
        )
        .await;

        let content = &response["result"]["content"][0];
        assert_eq!(content["type"], "text");
        let echoed: Value = serde_json::from_str(content["text"].as_str().unwrap()).unwrap();
        assert_eq!(echoed, json!({"text": "hi", "times": 3}));
    }

    #[tokio::test]
    async fn test_unknown_tool_then_next_request_still_served() {
        let server = server();
        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"missing"}}"#,
        )
        .await;
        assert_eq!(response["error"]["code"], json!(-1));
        assert!(response["error"]["message"].as_str().unwrap().contains("missing"));

        let response = call(&server, r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#).await;
        assert_eq!(response["id"], json!(3));
        assert!(response.get("error").is_none());
    }

    #[tokio::test]
    async fn test_validation_and_execution_failures() {
        let server = server();
        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"echo","arguments":{"times":"x"}}}"#,
        )
        .await;
        assert_eq!(response["error"]["code"], json!(-1));

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"broken"}}"#,
        )
        .await;
        assert_eq!(response["error"]["code"], json!(-1));
        assert!(response["error"]["message"].as_str().unwrap().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_invalid_call_params() {
        let server = server();
        let response = call(&server, r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{}}"#).await;
        assert_eq!(response["error"]["code"], json!(-32602));

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"echo","arguments":[1]}}"#,
        )
        .await;
        assert_eq!(response["error"]["code"], json!(-32602));
    }

    #[tokio::test]
    async fn test_malformed_and_notifications_get_no_response() {
        let server = server();
        assert!(server.handle_line("{not json").await.is_none());
        assert!(
            server
                .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_unknown_method_and_initialize() {
        let server = server();
        let response = call(&server, r#"{"jsonrpc":"2.0","id":8,"method":"resources/list"}"#).await;
        assert_eq!(response["error"]["code"], json!(-32601));

        let response = call(&server, r#"{"jsonrpc":"2.0","id":9,"method":"initialize"}"#).await;
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "toolbelt");
    }
}
