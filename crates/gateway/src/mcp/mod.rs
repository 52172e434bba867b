//! MCP server plumbing: JSON-RPC framing, payload types, and the
//! per-connection lifecycle state machine.

pub mod connection;
pub mod jsonrpc;
pub mod types;

pub use connection::McpConnection;

use lg_catalog::{dispatch, OperationRegistry};
use lg_gitlab::GitLabProvider;

use self::types::{CallToolParams, CallToolResult, ListToolsResult, Tool};

/// Protocol revisions this server accepts, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

/// Echo a supported requested version, otherwise answer with our newest.
pub fn negotiate_protocol(requested: &str) -> String {
    if SUPPORTED_PROTOCOL_VERSIONS.contains(&requested) {
        requested.to_owned()
    } else {
        SUPPORTED_PROTOCOL_VERSIONS[0].to_owned()
    }
}

/// The `tools/list` result for the full catalog.
pub fn list_tools(registry: &OperationRegistry) -> ListToolsResult {
    ListToolsResult {
        tools: registry
            .tool_definitions()
            .into_iter()
            .map(Tool::from)
            .collect(),
    }
}

/// Run one tool call through the dispatcher and wrap it for the wire.
pub async fn call_tool(
    provider: &dyn GitLabProvider,
    registry: &OperationRegistry,
    params: &CallToolParams,
) -> CallToolResult {
    let (content, is_error) =
        dispatch::dispatch(provider, registry, &params.name, &params.arguments).await;
    CallToolResult::text(content, is_error)
}
