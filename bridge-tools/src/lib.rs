//! Tool registration for the MCP bridge.
//!
//! A tool is a named, schema-described unit of functionality. Registration
//! adapts either an async function or an executor object into one uniform
//! [`ToolExecutor`] shape, resolves the declared permissions eagerly, and
//! stores an immutable [`ToolDescriptor`] in the process-wide registry.

#![warn(missing_docs, clippy::pedantic)]

pub mod registry;
pub mod schema;

pub use registry::{
    TargetLoader, ToolDescriptor, ToolError, ToolExecutor, ToolRegistration, ToolRegistry,
    ToolResult, ToolSummary,
};
pub use schema::{ParameterKind, ParameterSchema, SchemaError};
