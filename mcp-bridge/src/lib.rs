//! MCP bridge SDK facade.
//!
//! Depend on this crate via `cargo add mcp-bridge`. It bundles the bridge
//! crates behind feature flags so applications can enable or disable
//! components as needed: register tools, attach permissions, and either mount
//! the server or drive the invocation adapter directly.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use bridge_primitives as primitives;

/// Permission predicates and chains (enabled by `permissions` feature).
#[cfg(feature = "permissions")]
pub use bridge_permissions as permissions;

/// Tool registration and schemas (enabled by `tools` feature).
#[cfg(feature = "tools")]
pub use bridge_tools as tools;

/// Invocation dispatch (enabled by `dispatch` feature).
#[cfg(feature = "dispatch")]
pub use bridge_dispatch as dispatch;

/// Configuration management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use bridge_config as config;

/// Observability bootstrap (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use bridge_telemetry as telemetry;

/// HTTP transport and CLI (enabled by `server` feature).
#[cfg(feature = "server")]
pub use bridge_server as server;
