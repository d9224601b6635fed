//! Application state shared across request handlers.

use std::sync::Arc;

use bridge_config::BridgeConfig;
use bridge_dispatch::{InvocationAdapter, TracingDecisionObserver};
use bridge_primitives::{Identity, SubjectId};
use bridge_tools::ToolRegistry;

/// State handed to every handler: configuration, the invocation adapter, and
/// the identity bearer-authenticated MCP clients run as.
#[derive(Clone)]
pub struct AppState {
    config: Arc<BridgeConfig>,
    adapter: Arc<InvocationAdapter>,
    service_identity: Identity,
}

impl AppState {
    /// Builds the state for a configured registry.
    #[must_use]
    pub fn new(config: Arc<BridgeConfig>, registry: Arc<ToolRegistry>) -> Self {
        let adapter = InvocationAdapter::new(registry)
            .with_observer(Arc::new(TracingDecisionObserver));
        Self {
            config,
            adapter: Arc::new(adapter),
            service_identity: Identity::new(SubjectId::random(), "mcp-client"),
        }
    }

    /// Returns the bridge configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the invocation adapter.
    #[must_use]
    pub fn adapter(&self) -> &InvocationAdapter {
        &self.adapter
    }

    /// Returns the registry served by this state.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        self.adapter.registry()
    }

    /// Returns the per-process identity assigned to token-authenticated
    /// clients.
    #[must_use]
    pub fn service_identity(&self) -> &Identity {
        &self.service_identity
    }
}
