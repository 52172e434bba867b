//! MCP connection state machine (lifecycle enforcement + method routing).
//!
//! One instance per stdio connection.  `tools/list` and `tools/call` are
//! refused until the client has completed `initialize` and sent the
//! `notifications/initialized` notification.

use std::sync::Arc;

use serde_json::Value;

use lg_catalog::OperationRegistry;
use lg_gitlab::GitLabProvider;

use super::jsonrpc::{JsonRpcError, JsonRpcId, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse};
use super::types::{CallToolParams, InitializeParams, InitializeResult, ServerInfo};
use super::{call_tool, list_tools, negotiate_protocol};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ConnState {
    New,
    InitResponded,
    Ready,
}

pub struct McpConnection {
    state: ConnState,
    registry: Arc<OperationRegistry>,
    gitlab: Arc<dyn GitLabProvider>,
}

impl McpConnection {
    pub fn new(registry: Arc<OperationRegistry>, gitlab: Arc<dyn GitLabProvider>) -> Self {
        Self {
            state: ConnState::New,
            registry,
            gitlab,
        }
    }

    /// Handle a single JSON-RPC message.
    ///
    /// Returns `Some(response)` for requests, `None` for notifications.
    pub async fn handle_message(&mut self, msg: JsonRpcMessage) -> Option<JsonRpcResponse> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(n) => {
                if n.method == "notifications/initialized" && self.state == ConnState::InitResponded
                {
                    self.state = ConnState::Ready;
                }
                None
            }
        }
    }

    async fn handle_request(&mut self, req: JsonRpcRequest) -> JsonRpcResponse {
        if req.jsonrpc != "2.0" {
            return error(req.id, -32600, "invalid jsonrpc version");
        }

        match req.method.as_str() {
            "initialize" => self.handle_initialize(req),
            // Allowed in any state.
            "ping" => JsonRpcResponse::ok(req.id, serde_json::json!({})),
            "tools/list" => {
                if self.state != ConnState::Ready {
                    return error(req.id, -32002, "not initialized");
                }
                let result = list_tools(&self.registry);
                JsonRpcResponse::ok(req.id, to_value(result))
            }
            "tools/call" => {
                if self.state != ConnState::Ready {
                    return error(req.id, -32002, "not initialized");
                }
                let Some(params) = req.params else {
                    return error(req.id, -32602, "missing params");
                };
                let params: CallToolParams = match serde_json::from_value(params) {
                    Ok(p) => p,
                    Err(e) => return error(req.id, -32602, e.to_string()),
                };
                let result = call_tool(self.gitlab.as_ref(), &self.registry, &params).await;
                JsonRpcResponse::ok(req.id, to_value(result))
            }
            _ => error(req.id, -32601, "method not found"),
        }
    }

    fn handle_initialize(&mut self, req: JsonRpcRequest) -> JsonRpcResponse {
        if self.state != ConnState::New {
            return error(req.id, -32600, "already initialized");
        }
        let Some(params) = req.params else {
            return error(req.id, -32602, "missing params");
        };
        let init: InitializeParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return error(req.id, -32602, e.to_string()),
        };

        self.state = ConnState::InitResponded;
        tracing::info!(
            client = %init.client_info.name,
            requested = %init.protocol_version,
            "MCP client connected"
        );

        JsonRpcResponse::ok(req.id, to_value(initialize_result(&init.protocol_version)))
    }
}

/// The `initialize` result for a requested protocol version.
pub fn initialize_result(requested_version: &str) -> InitializeResult {
    InitializeResult {
        protocol_version: negotiate_protocol(requested_version),
        capabilities: serde_json::json!({ "tools": { "listChanged": false } }),
        server_info: ServerInfo {
            name: "labgate".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        },
    }
}

fn error(id: JsonRpcId, code: i64, message: impl Into<String>) -> JsonRpcResponse {
    JsonRpcResponse::err(
        id,
        JsonRpcError {
            code,
            message: message.into(),
            data: None,
        },
    )
}

fn to_value(value: impl serde::Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::super::jsonrpc::JsonRpcNotification;
    use super::super::SUPPORTED_PROTOCOL_VERSIONS;
    use super::*;
    use async_trait::async_trait;
    use lg_domain::error::{Error, Result};
    use serde_json::{json, Map};

    /// Provider double: every call fails as unreachable.
    struct OfflineProvider;

    #[async_trait]
    impl GitLabProvider for OfflineProvider {
        async fn get(&self, _: &str, _: &[(String, String)]) -> Result<Value> {
            Err(Error::Connectivity("offline".into()))
        }
        async fn post(&self, _: &str, _: &Map<String, Value>) -> Result<Value> {
            Err(Error::Connectivity("offline".into()))
        }
        async fn put(&self, _: &str, _: &Map<String, Value>) -> Result<Value> {
            Err(Error::Connectivity("offline".into()))
        }
        async fn delete(&self, _: &str) -> Result<()> {
            Err(Error::Connectivity("offline".into()))
        }
    }

    fn mk_conn() -> McpConnection {
        McpConnection::new(Arc::new(OperationRegistry::new()), Arc::new(OfflineProvider))
    }

    fn request(id: i64, method: &str, params: Option<Value>) -> JsonRpcMessage {
        JsonRpcMessage::Request(JsonRpcRequest::new(JsonRpcId::Number(id), method, params))
    }

    async fn initialize(conn: &mut McpConnection) {
        let resp = conn
            .handle_message(request(
                1,
                "initialize",
                Some(json!({ "protocolVersion": "2024-11-05" })),
            ))
            .await
            .unwrap();
        assert!(!resp.is_error());
        conn.handle_message(JsonRpcMessage::Notification(JsonRpcNotification::new(
            "notifications/initialized",
        )))
        .await;
    }

    #[tokio::test]
    async fn lifecycle_blocks_tools_until_initialized() {
        let mut conn = mk_conn();

        let resp = conn
            .handle_message(request(1, "tools/list", None))
            .await
            .unwrap();
        assert_eq!(resp.error.as_ref().map(|e| e.code), Some(-32002));

        // ping works in any state.
        let resp = conn.handle_message(request(2, "ping", None)).await.unwrap();
        assert!(!resp.is_error());

        let resp = conn
            .handle_message(request(
                3,
                "initialize",
                Some(json!({ "protocolVersion": "2024-11-05" })),
            ))
            .await
            .unwrap();
        assert!(!resp.is_error());

        // Still blocked until the initialized notification arrives.
        let resp = conn
            .handle_message(request(4, "tools/list", None))
            .await
            .unwrap();
        assert_eq!(resp.error.as_ref().map(|e| e.code), Some(-32002));

        conn.handle_message(JsonRpcMessage::Notification(JsonRpcNotification::new(
            "notifications/initialized",
        )))
        .await;

        let resp = conn
            .handle_message(request(5, "tools/list", None))
            .await
            .unwrap();
        assert!(!resp.is_error());
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().len();
        assert_eq!(tools, 21);
    }

    #[tokio::test]
    async fn supported_protocol_version_is_echoed() {
        let mut conn = mk_conn();
        let resp = conn
            .handle_message(request(
                1,
                "initialize",
                Some(json!({ "protocolVersion": "2024-11-05" })),
            ))
            .await
            .unwrap();
        assert_eq!(resp.result.unwrap()["protocolVersion"], "2024-11-05");
    }

    #[tokio::test]
    async fn unknown_protocol_version_falls_back_to_newest() {
        let mut conn = mk_conn();
        let resp = conn
            .handle_message(request(
                1,
                "initialize",
                Some(json!({ "protocolVersion": "1999-01-01" })),
            ))
            .await
            .unwrap();
        assert_eq!(
            resp.result.unwrap()["protocolVersion"],
            SUPPORTED_PROTOCOL_VERSIONS[0]
        );
    }

    #[tokio::test]
    async fn double_initialize_is_rejected() {
        let mut conn = mk_conn();
        initialize(&mut conn).await;
        let resp = conn
            .handle_message(request(
                9,
                "initialize",
                Some(json!({ "protocolVersion": "2024-11-05" })),
            ))
            .await
            .unwrap();
        assert_eq!(resp.error.as_ref().map(|e| e.code), Some(-32600));
    }

    #[tokio::test]
    async fn unknown_method_is_error() {
        let mut conn = mk_conn();
        let resp = conn.handle_message(request(1, "nope", None)).await.unwrap();
        assert_eq!(resp.error.as_ref().map(|e| e.code), Some(-32601));
    }

    #[tokio::test]
    async fn tool_failures_stay_in_band() {
        // A failing remote must surface as isError content, not a JSON-RPC error.
        let mut conn = mk_conn();
        initialize(&mut conn).await;

        let resp = conn
            .handle_message(request(
                5,
                "tools/call",
                Some(json!({ "name": "list_webhooks", "arguments": { "project_id": "42" } })),
            ))
            .await
            .unwrap();
        assert!(!resp.is_error());
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("connection error:"));
    }

    #[tokio::test]
    async fn tools_call_requires_params() {
        let mut conn = mk_conn();
        initialize(&mut conn).await;
        let resp = conn
            .handle_message(request(6, "tools/call", None))
            .await
            .unwrap();
        assert_eq!(resp.error.as_ref().map(|e| e.code), Some(-32602));
    }
}
