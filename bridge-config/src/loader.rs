//! Configuration loading: defaults, TOML file, environment overrides.

use std::path::Path;

use tracing::info;

use crate::schema::{BridgeConfig, ConfigError};

/// Loads the bridge configuration.
///
/// Starts from the built-in defaults, merges the TOML file when one is
/// supplied and exists, then applies `MCP_*` environment overrides, and
/// finally validates the result.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or parsed, an
/// environment variable carries an unparsable value, or validation fails.
pub fn load(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let mut config = match path {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        Some(path) => {
            info!(path = %path.display(), "configuration file not found, using defaults");
            BridgeConfig::default()
        }
        None => BridgeConfig::default(),
    };

    apply_env(&mut config, |name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}

/// Applies `MCP_*` overrides read through the supplied getter.
fn apply_env<F>(config: &mut BridgeConfig, get: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = get("MCP_ENABLED") {
        config.enabled = parse_bool("MCP_ENABLED", &value)?;
    }
    if let Some(value) = get("MCP_SERVER_NAME") {
        config.server_name = value;
    }
    if let Some(value) = get("MCP_SERVER_VERSION") {
        config.version = value;
    }
    if let Some(value) = get("MCP_SERVER_INSTRUCTIONS") {
        config.instructions = Some(value);
    }
    if let Some(value) = get("MCP_HOST") {
        config.host = value;
    }
    if let Some(value) = get("MCP_PORT") {
        config.port = value
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                variable: "MCP_PORT".to_owned(),
                reason: format!("`{value}` is not a port number"),
            })?;
    }
    if let Some(value) = get("MCP_HTTP_PATH") {
        config.http_path = value;
    }
    if let Some(value) = get("MCP_AUTH_TOKEN") {
        config.auth_token = Some(value);
    }
    if let Some(value) = get("MCP_WORKERS") {
        config.workers = value
            .parse()
            .map_err(|_| ConfigError::InvalidEnv {
                variable: "MCP_WORKERS".to_owned(),
                reason: format!("`{value}` is not a worker count"),
            })?;
    }
    if let Some(value) = get("MCP_LOG_LEVEL") {
        config.log_level = value;
    }
    if let Some(value) = get("MCP_LOG_REQUESTS") {
        config.log_requests = parse_bool("MCP_LOG_REQUESTS", &value)?;
    }

    Ok(())
}

fn parse_bool(variable: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            variable: variable.to_owned(),
            reason: format!("`{value}` is not a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn env_overrides_apply() {
        let vars = env(&[
            ("MCP_SERVER_NAME", "Blog MCP"),
            ("MCP_PORT", "9001"),
            ("MCP_ENABLED", "off"),
            ("MCP_AUTH_TOKEN", "s3cret"),
            ("MCP_SERVER_INSTRUCTIONS", "Be gentle."),
        ]);

        let mut config = BridgeConfig::default();
        apply_env(&mut config, |name| vars.get(name).cloned()).expect("overrides apply");

        assert_eq!(config.server_name, "Blog MCP");
        assert_eq!(config.port, 9001);
        assert!(!config.enabled);
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
        assert_eq!(config.instructions.as_deref(), Some("Be gentle."));
    }

    #[test]
    fn bad_port_override_errors() {
        let vars = env(&[("MCP_PORT", "not-a-port")]);
        let mut config = BridgeConfig::default();
        let err = apply_env(&mut config, |name| vars.get(name).cloned())
            .expect_err("bad port rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { variable, .. } if variable == "MCP_PORT"
        ));
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        for value in ["1", "true", "Yes", "ON"] {
            assert!(parse_bool("MCP_ENABLED", value).unwrap());
        }
        for value in ["0", "false", "No", "off"] {
            assert!(!parse_bool("MCP_ENABLED", value).unwrap());
        }
        assert!(parse_bool("MCP_ENABLED", "maybe").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load(Some(Path::new("/nonexistent/bridge.toml"))).expect("defaults");
        assert_eq!(config.port, BridgeConfig::default().port);
    }
}
