//! CLI arguments and the serve loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bridge_config::{BridgeConfig, ConfigError};
use bridge_tools::ToolRegistry;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::routes::router;
use crate::state::AppState;

/// Command-line flags for the bridge server.
#[derive(Parser, Debug)]
#[command(
    name = "mcp-bridge-server",
    about = "Serve registered tools over the Model Context Protocol"
)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Bind host (overrides configuration)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable the SIGHUP configuration-reload handler
    #[arg(long)]
    pub noreload: bool,

    /// Worker threads for the server runtime (overrides configuration)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Bearer token required from MCP clients (overrides configuration)
    #[arg(long = "mcp-token")]
    pub mcp_token: Option<String>,
}

impl Args {
    /// Loads the configuration and applies the CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails; the caller
    /// is expected to abort startup with a non-zero exit code.
    pub fn load_config(&self) -> Result<BridgeConfig, ConfigError> {
        let mut config = bridge_config::load(self.config.as_deref())?;
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(token) = &self.mcp_token {
            config.auth_token = Some(token.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

/// Serves the registry until shutdown.
///
/// Binds the configured address, mounts the router, and drains gracefully on
/// ctrl-c. Returns an error when the address cannot be bound so the process
/// can exit non-zero on startup failure.
///
/// # Errors
///
/// Returns an error when binding or serving fails.
pub async fn serve(config: Arc<BridgeConfig>, registry: Arc<ToolRegistry>) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&config), registry);
    let app = router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    if config.enabled {
        info!(addr = %addr, path = %config.http_path, "MCP bridge listening");
    } else {
        warn!(addr = %addr, "MCP bridge disabled; serving health probe only");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("MCP bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to listen for shutdown signal");
    }
}

/// Installs a SIGHUP handler that re-reads the configuration file.
///
/// Settings that cannot change on a live server (bind address, worker count)
/// are logged as requiring a restart. Suppressed by `--noreload`.
#[cfg(unix)]
pub fn spawn_reload_handler(path: Option<PathBuf>) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "failed to install SIGHUP handler");
                return;
            }
        };

        while hangup.recv().await.is_some() {
            match bridge_config::load(path.as_deref()) {
                Ok(next) => info!(
                    addr = %next.bind_addr(),
                    workers = next.workers,
                    "configuration re-read; bind address and worker changes take effect on restart"
                ),
                Err(err) => {
                    warn!(error = %err, "configuration reload failed; keeping current settings");
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_beat_configuration() {
        let args = Args::parse_from([
            "mcp-bridge-server",
            "--host",
            "0.0.0.0",
            "--port",
            "9100",
            "--workers",
            "2",
            "--mcp-token",
            "s3cret",
            "--noreload",
        ]);

        let config = args.load_config().expect("valid");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9100);
        assert_eq!(config.workers, 2);
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
        assert!(args.noreload);
    }

    #[test]
    fn invalid_override_fails_startup() {
        let args = Args::parse_from(["mcp-bridge-server", "--workers", "0"]);
        assert!(args.load_config().is_err());
    }
}
