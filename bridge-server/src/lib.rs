//! HTTP transport and process entry point for the MCP bridge.
//!
//! Mounts the MCP JSON-RPC endpoint onto an axum router, authenticates MCP
//! clients with an optional bearer token, and exposes the CLI used by the
//! `mcp-bridge-server` binary. The wire protocol engine itself stays thin:
//! this crate only defines the typed messages it consumes and produces.

#![warn(missing_docs, clippy::pedantic)]

pub mod auth;
pub mod cli;
pub mod diagnostics;
pub mod protocol;
pub mod routes;
pub mod state;

pub use cli::{Args, serve};
pub use routes::router;
pub use state::AppState;
