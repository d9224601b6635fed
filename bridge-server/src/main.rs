//! Standalone MCP bridge server.
//!
//! Serves the built-in diagnostic tools; applications embedding the bridge
//! call [`bridge_server::serve`] with their own registry instead.

use std::process::ExitCode;
use std::sync::Arc;

use bridge_server::diagnostics::register_diagnostics;
use bridge_server::{Args, serve};
use bridge_tools::ToolRegistry;
use clap::Parser;
use tracing::error;

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = bridge_telemetry::tracing_support::init(&config.log_level) {
        eprintln!("telemetry error: {err}");
        return ExitCode::FAILURE;
    }

    let registry = Arc::new(ToolRegistry::new());
    if let Err(err) = register_diagnostics(&registry, &config) {
        error!(error = %err, "failed to register diagnostic tools");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let config = Arc::new(config);
    let result = runtime.block_on(async {
        #[cfg(unix)]
        {
            if !args.noreload {
                bridge_server::cli::spawn_reload_handler(args.config.clone());
            }
        }

        serve(Arc::clone(&config), registry).await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "server error");
            ExitCode::FAILURE
        }
    }
}
