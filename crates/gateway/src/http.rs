//! Multi-tenant HTTP transport: one JSON-RPC message per `POST /mcp`.
//!
//! `initialize` must carry the caller's credential in the
//! `X-GitLab-Token` header; a missing credential is rejected with 401
//! before any session exists.  The response binds the credential in the
//! [`CredentialStore`] and returns a fresh `Mcp-Session-Id` header; every
//! subsequent call presents that header and runs against a client derived
//! for the bound token.  `DELETE /mcp` discards the session.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use lg_catalog::OperationRegistry;
use lg_gitlab::RestGitLabClient;

use crate::mcp::connection::initialize_result;
use crate::mcp::jsonrpc::{JsonRpcError, JsonRpcId, JsonRpcMessage, JsonRpcResponse};
use crate::mcp::types::{CallToolParams, InitializeParams};
use crate::mcp::{call_tool, list_tools};
use crate::sessions::CredentialStore;

/// Header carrying the caller's GitLab credential at session start.
pub const TOKEN_HEADER: &str = "x-gitlab-token";
/// Header carrying the session ID on every call after `initialize`.
pub const SESSION_HEADER: &str = "mcp-session-id";

#[derive(Clone)]
pub struct HttpState {
    pub registry: Arc<OperationRegistry>,
    pub credentials: Arc<CredentialStore>,
    /// Credential-less template; per-session clients derive from it via
    /// `with_token`, sharing one connection pool.
    pub template: RestGitLabClient,
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/mcp", post(handle_message).delete(handle_close))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: std::net::SocketAddr, state: HttpState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving MCP over HTTP");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Handlers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn handle_message(
    State(state): State<HttpState>,
    headers: HeaderMap,
    Json(msg): Json<JsonRpcMessage>,
) -> Response {
    let req = match msg {
        // Notifications carry no response; acknowledge receipt.
        JsonRpcMessage::Notification(_) => return StatusCode::ACCEPTED.into_response(),
        JsonRpcMessage::Request(req) => req,
    };

    match req.method.as_str() {
        "initialize" => handle_initialize(&state, &headers, req.id, req.params),
        "ping" => Json(JsonRpcResponse::ok(req.id, json!({}))).into_response(),
        "tools/list" | "tools/call" => {
            let Some(session_id) = header_str(&headers, SESSION_HEADER) else {
                return protocol_error(
                    StatusCode::BAD_REQUEST,
                    format!("missing {SESSION_HEADER} header"),
                );
            };
            let Some(token) = state.credentials.token(session_id) else {
                return protocol_error(StatusCode::NOT_FOUND, "unknown or closed session");
            };

            if req.method == "tools/list" {
                let result = list_tools(&state.registry);
                return Json(JsonRpcResponse::ok(req.id, to_value(result))).into_response();
            }

            let Some(params) = req.params else {
                return Json(rpc_error(req.id, -32602, "missing params")).into_response();
            };
            let params: CallToolParams = match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return Json(rpc_error(req.id, -32602, e.to_string())).into_response()
                }
            };

            let client = state.template.with_token(token);
            let result = call_tool(&client, &state.registry, &params).await;
            Json(JsonRpcResponse::ok(req.id, to_value(result))).into_response()
        }
        _ => Json(rpc_error(req.id, -32601, "method not found")).into_response(),
    }
}

fn handle_initialize(
    state: &HttpState,
    headers: &HeaderMap,
    id: JsonRpcId,
    params: Option<serde_json::Value>,
) -> Response {
    // Rejected before any session exists, the distinct protocol-boundary
    // error for a missing credential in multi-tenant mode.
    let Some(token) = header_str(headers, TOKEN_HEADER) else {
        return protocol_error(
            StatusCode::UNAUTHORIZED,
            format!("missing {TOKEN_HEADER} header"),
        );
    };

    let Some(params) = params else {
        return Json(rpc_error(id, -32602, "missing params")).into_response();
    };
    let init: InitializeParams = match serde_json::from_value(params) {
        Ok(p) => p,
        Err(e) => return Json(rpc_error(id, -32602, e.to_string())).into_response(),
    };

    let entry = state.credentials.bind(token);
    let resp = JsonRpcResponse::ok(id, to_value(initialize_result(&init.protocol_version)));
    (
        [(SESSION_HEADER, entry.session_id)],
        Json(resp),
    )
        .into_response()
}

pub async fn handle_close(State(state): State<HttpState>, headers: HeaderMap) -> Response {
    let Some(session_id) = header_str(&headers, SESSION_HEADER) else {
        return protocol_error(
            StatusCode::BAD_REQUEST,
            format!("missing {SESSION_HEADER} header"),
        );
    };
    if state.credentials.discard(session_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        protocol_error(StatusCode::NOT_FOUND, "unknown or closed session")
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn rpc_error(id: JsonRpcId, code: i64, message: impl Into<String>) -> JsonRpcResponse {
    JsonRpcResponse::err(
        id,
        JsonRpcError {
            code,
            message: message.into(),
            data: None,
        },
    )
}

fn protocol_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn to_value(value: impl serde::Serialize) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
