//! Bridge configuration schema.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override carried an unparsable value.
    #[error("invalid value for `{variable}`: {reason}")]
    InvalidEnv {
        /// The offending environment variable.
        variable: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The resulting configuration is unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Why the configuration was rejected.
        reason: String,
    },
}

fn default_enabled() -> bool {
    true
}

fn default_server_name() -> String {
    "MCP Bridge".to_owned()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}

fn default_host() -> String {
    "localhost".to_owned()
}

fn default_port() -> u16 {
    8000
}

fn default_http_path() -> String {
    "/mcp".to_owned()
}

fn default_workers() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_requests() -> bool {
    true
}

/// Settings recognized by the bridge.
///
/// Every field has a TOML key of the same name and an `MCP_*` environment
/// override (see [`crate::load`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Feature flag: when off, the HTTP mount serves only the health probe.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Display name surfaced to MCP clients during `initialize`.
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Version string surfaced to MCP clients.
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional free-text instructions surfaced to MCP clients.
    #[serde(default)]
    pub instructions: Option<String>,

    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Mount path for the MCP endpoint.
    #[serde(default = "default_http_path")]
    pub http_path: String,

    /// Bearer token required from MCP clients; `None` disables transport
    /// authentication and callers run as the anonymous subject.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Worker threads for the server runtime.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to trace individual HTTP requests.
    #[serde(default = "default_log_requests")]
    pub log_requests: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            server_name: default_server_name(),
            version: default_version(),
            instructions: None,
            host: default_host(),
            port: default_port(),
            http_path: default_http_path(),
            auth_token: None,
            workers: default_workers(),
            log_level: default_log_level(),
            log_requests: default_log_requests(),
        }
    }
}

impl BridgeConfig {
    /// Returns the socket address string to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero port, a mount path that
    /// does not start with `/`, or a zero worker count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid {
                reason: format!("invalid port: {}", self.port),
            });
        }

        if !self.http_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                reason: format!("HTTP path must start with '/': {}", self.http_path),
            });
        }

        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                reason: "worker count must be at least 1".to_owned(),
            });
        }

        Ok(())
    }
}
