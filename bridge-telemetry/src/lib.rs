//! Observability bootstrap for the MCP bridge.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support {
    //! Structured tracing initialization.

    use thiserror::Error;
    use tracing_subscriber::EnvFilter;

    /// Errors raised while installing the tracing subscriber.
    #[derive(Debug, Error)]
    pub enum TelemetryError {
        /// A global subscriber is already installed.
        #[error("tracing subscriber already installed")]
        AlreadyInstalled,
    }

    /// Installs the global tracing subscriber.
    ///
    /// `RUST_LOG` wins when set; otherwise the supplied default filter (the
    /// configured `log_level`) applies.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::AlreadyInstalled`] when a global subscriber
    /// has already been set, for example by the hosting application.
    pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .map_err(|_| TelemetryError::AlreadyInstalled)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn double_init_reports_already_installed() {
            // Whichever call wins the race installs the subscriber; the
            // second must fail cleanly rather than panic.
            let first = init("info");
            let second = init("debug");
            assert!(first.is_ok() || matches!(first, Err(TelemetryError::AlreadyInstalled)));
            assert!(matches!(second, Err(TelemetryError::AlreadyInstalled)));
        }
    }
}
