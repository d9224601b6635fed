//! Configuration management for the MCP bridge.
//!
//! Settings layer in three steps: built-in defaults, an optional TOML file,
//! then `MCP_*` environment variables. Validation failures are fatal at
//! startup; a misconfigured bridge must not come up half-working.

#![warn(missing_docs, clippy::pedantic)]

mod loader;
mod schema;

pub use loader::load;
pub use schema::{BridgeConfig, ConfigError};
