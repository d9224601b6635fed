//! Axum router and the MCP request handler.

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::auth::{self, AuthError};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolSchema, ToolsCapability,
};
use crate::state::AppState;

/// Builds the application router.
///
/// The MCP endpoint mounts at the configured `http_path`; when the bridge is
/// disabled only the health probe is served. Request tracing is attached when
/// `log_requests` is on.
#[must_use]
pub fn router(state: AppState) -> Router {
    let mcp_path = state.config().http_path.clone();
    let log_requests = state.config().log_requests;

    let mut router = Router::new().route("/healthz", get(healthz));
    if state.config().enabled {
        router = router.route(&mcp_path, post(handle_rpc));
    }

    let router = router.with_state(state);
    if log_requests {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn handle_rpc(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    process(&state, &headers, raw_query.as_deref(), request)
        .await
        .into_response()
}

/// Outcome of one MCP request, before HTTP rendering.
#[derive(Debug)]
pub(crate) enum RpcReply {
    /// Notification acknowledged, no body.
    Accepted,
    /// Transport authentication failed.
    Unauthorized(AuthError),
    /// A JSON-RPC response.
    Response(JsonRpcResponse),
}

impl IntoResponse for RpcReply {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted => StatusCode::ACCEPTED.into_response(),
            Self::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err.to_string()).into_response(),
            Self::Response(response) => Json(response).into_response(),
        }
    }
}

pub(crate) async fn process(
    state: &AppState,
    headers: &HeaderMap,
    raw_query: Option<&str>,
    request: JsonRpcRequest,
) -> RpcReply {
    let subject = match auth::authenticate(
        state.config().auth_token.as_deref(),
        state.service_identity(),
        headers,
    ) {
        Ok(subject) => subject,
        Err(err) => return RpcReply::Unauthorized(err),
    };

    if request.is_notification() {
        debug!(method = %request.method, "notification acknowledged");
        return RpcReply::Accepted;
    }
    let id = request.id.unwrap_or(Value::Null);

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(id, initialize_result(state)),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => {
            let tools = state
                .registry()
                .list()
                .into_iter()
                .map(ToolSchema::from)
                .collect();
            JsonRpcResponse::success(id, ListToolsResult { tools })
        }
        "tools/call" => call_tool(state, headers, raw_query, subject, id, request.params).await,
        other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
    };

    RpcReply::Response(response)
}

fn initialize_result(state: &AppState) -> InitializeResult {
    let config = state.config();
    InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_owned(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
        },
        server_info: ServerInfo {
            name: config.server_name.clone(),
            version: config.version.clone(),
        },
        instructions: config.instructions.clone(),
    }
}

async fn call_tool(
    state: &AppState,
    headers: &HeaderMap,
    raw_query: Option<&str>,
    subject: bridge_primitives::Subject,
    id: Value,
    params: Option<Value>,
) -> JsonRpcResponse {
    let params: CallToolParams = match params {
        Some(params) => match serde_json::from_value(params) {
            Ok(params) => params,
            Err(err) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("invalid tools/call params: {err}")),
                );
            }
        },
        None => {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params("missing tools/call params"),
            );
        }
    };

    let ctx = auth::build_context(subject, headers, raw_query);
    match state
        .adapter()
        .invoke(&ctx, &params.name, params.arguments)
        .await
    {
        Ok(value) => JsonRpcResponse::success(id, CallToolResult::from_value(value)),
        Err(err) => JsonRpcResponse::error(id, JsonRpcError::from(&err)),
    }
}
