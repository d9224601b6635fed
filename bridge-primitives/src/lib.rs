//! Core shared types for the MCP bridge.

#![warn(missing_docs, clippy::pedantic)]

mod context;
mod error;
mod subject;
mod tool_name;

/// Per-invocation request context carrying the caller and ambient metadata.
pub use context::RequestContext;
/// Error type and result alias shared across the bridge.
pub use error::{Error, Result};
/// Caller identity types.
pub use subject::{Identity, Subject, SubjectId};
/// Validated tool name.
pub use tool_name::ToolName;
