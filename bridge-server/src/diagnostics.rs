//! Built-in diagnostic tools for smoke-checking a deployment.

use bridge_config::BridgeConfig;
use bridge_tools::{
    ParameterKind, ParameterSchema, ToolRegistration, ToolRegistry, ToolResult,
};
use serde_json::{Value, json};

/// Registers the `echo` and `server_info` tools.
///
/// Both are open to any caller; transport authentication (the bearer token)
/// still applies. They exist so a bare deployment can be exercised end to end
/// before any application tools are wired in.
///
/// # Errors
///
/// Propagates registration failures, for example when the host application
/// already registered a tool under one of these names.
pub fn register_diagnostics(
    registry: &ToolRegistry,
    config: &BridgeConfig,
) -> ToolResult<()> {
    registry.register(
        ToolRegistration::new("echo")
            .description("Echo the supplied message back, for connectivity checks")
            .schema(ParameterSchema::new().required(
                "message",
                ParameterKind::String,
                "Text to echo",
            ))
            .permission("AllowAny"),
        |arguments: Value| async move { Ok(arguments) },
    )?;

    let server_name = config.server_name.clone();
    let version = config.version.clone();
    registry.register(
        ToolRegistration::new("server_info")
            .description("Report the bridge's name and version")
            .permission("AllowAny"),
        move |_arguments: Value| {
            let server_name = server_name.clone();
            let version = version.clone();
            async move {
                Ok(json!({
                    "name": server_name,
                    "version": version,
                }))
            }
        },
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_dispatch::InvocationAdapter;
    use bridge_primitives::RequestContext;
    use std::sync::Arc;

    #[tokio::test]
    async fn diagnostics_register_and_respond() {
        let registry = Arc::new(ToolRegistry::new());
        register_diagnostics(&registry, &BridgeConfig::default()).unwrap();

        let names: Vec<String> = registry.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["echo", "server_info"]);

        let adapter = InvocationAdapter::new(registry);
        let info = adapter
            .invoke(&RequestContext::anonymous(), "server_info", json!({}))
            .await
            .unwrap();
        assert_eq!(info["name"], json!("MCP Bridge"));
    }
}
