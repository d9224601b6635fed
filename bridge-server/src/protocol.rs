//! MCP message types (JSON-RPC 2.0 over HTTP).
//!
//! Only the tool surface is modeled: `initialize`, `tools/list`, and
//! `tools/call`, plus the envelope types. The protocol engine proper lives in
//! the MCP client; this bridge answers one request at a time.

use bridge_dispatch::DispatchError;
use bridge_tools::ToolSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision advertised during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const JSONRPC_VERSION: &str = "2.0";

/// Bridge-specific JSON-RPC error codes, outside the reserved range.
pub mod error_codes {
    /// Requested tool is not registered.
    pub const UNKNOWN_TOOL: i32 = -32001;
    /// The permission chain denied the call.
    pub const ACCESS_DENIED: i32 = -32002;
    /// The tool implementation failed.
    pub const EXECUTION_FAILED: i32 = -32003;
    /// Method is not part of the supported surface.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Request parameters failed validation.
    pub const INVALID_PARAMS: i32 = -32602;
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol marker, always `"2.0"`.
    pub jsonrpc: String,
    /// Request id; absent for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Returns `true` for notifications, which expect no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol marker, always `"2.0"`.
    pub jsonrpc: String,
    /// Id of the request being answered.
    pub id: Value,
    /// Success payload; mutually exclusive with `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error payload; mutually exclusive with `result`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Builds a success response.
    #[must_use]
    pub fn success(id: Value, result: impl Serialize) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            result: Some(serde_json::to_value(result).unwrap_or(Value::Null)),
            error: None,
        }
    }

    /// Builds an error response.
    #[must_use]
    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code.
    pub code: i32,
    /// Human-readable message.
    pub message: String,
}

impl JsonRpcError {
    /// Unsupported method.
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: error_codes::METHOD_NOT_FOUND,
            message: format!("Method not found: {method}"),
        }
    }

    /// Malformed or invalid parameters.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: error_codes::INVALID_PARAMS,
            message: message.into(),
        }
    }
}

impl From<&DispatchError> for JsonRpcError {
    fn from(err: &DispatchError) -> Self {
        let code = match err {
            DispatchError::UnknownTool { .. } => error_codes::UNKNOWN_TOOL,
            DispatchError::InvalidArguments { .. } => error_codes::INVALID_PARAMS,
            DispatchError::Denied { .. } => error_codes::ACCESS_DENIED,
            DispatchError::Execution { .. } => error_codes::EXECUTION_FAILED,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

/// Result of the `initialize` handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Advertised protocol revision.
    pub protocol_version: String,
    /// Capabilities of this server.
    pub capabilities: ServerCapabilities,
    /// Server identity.
    pub server_info: ServerInfo,
    /// Optional usage instructions surfaced to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Capability set advertised by the bridge: tools only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool capability flags.
    pub tools: ToolsCapability,
}

/// Tool capability flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the tool list can change after startup. The registry is
    /// append-only during a bounded startup phase, so this is always false.
    pub list_changed: bool,
}

/// Server identity advertised during `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Display name.
    pub name: String,
    /// Version string.
    pub version: String,
}

/// Tool definition entry in the `tools/list` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for the accepted arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl From<ToolSummary> for ToolSchema {
    fn from(summary: ToolSummary) -> Self {
        Self {
            name: summary.name,
            description: summary.description,
            input_schema: summary.input_schema,
        }
    }
}

/// `tools/list` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Registered tools in registration order.
    pub tools: Vec<ToolSchema>,
}

/// `tools/call` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Tool to invoke.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// One content block in a `tools/call` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Plain text content.
    Text {
        /// The text payload.
        text: String,
    },
}

impl ToolContent {
    /// Creates a text content block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// `tools/call` result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    /// Rendered content blocks.
    pub content: Vec<ToolContent>,
    /// The implementation's raw JSON return value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl CallToolResult {
    /// Wraps an implementation return value.
    ///
    /// String results are rendered verbatim; everything else is serialized to
    /// compact JSON for the text block, with the raw value carried alongside.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let text = match &value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Self {
            content: vec![ToolContent::text(text)],
            structured_content: Some(value),
        }
    }
}
