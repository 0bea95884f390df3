//! Server bootstrap orchestration.

use thiserror::Error;
use tracing::info;

use statute_config::{Config, ConfigError};
use statute_tools::{Dispatcher, ExecutionContext, SuccessPolicy};

use crate::router::Router;
use crate::server::Server;
use crate::telemetry::{self, TelemetryError};

/// Tracing target for bootstrap.
const BOOTSTRAP_TARGET: &str = "statute_mcp::bootstrap";

/// Source of the server configuration.
pub trait ConfigLoader: Send + Sync {
    /// Loads the server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration cannot be resolved.
    fn load(&self) -> Result<Config, ConfigError>;
}

/// Reads flags and environment of the running process via [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Config::load()
    }
}

/// Loader that returns a pre-resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config` so it can be handed to [`bootstrap_with`].
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}

/// Start-up failures.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("configuration error: {source}")]
    Configuration {
        /// Why the configuration was rejected.
        #[source]
        source: ConfigError,
    },
    /// Telemetry initialisation failed.
    #[error("telemetry error: {source}")]
    Telemetry {
        /// Why the subscriber could not be installed.
        #[source]
        source: TelemetryError,
    },
}

impl BootstrapError {
    /// Returns `true` when bootstrap stopped to print help or version text.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        match self {
            Self::Configuration { source } => source.is_informational(),
            Self::Telemetry { .. } => false,
        }
    }
}

/// Builds the execution bounds described by `config`.
#[must_use]
pub fn execution_context(config: &Config) -> ExecutionContext {
    let policy = if config.strict_exit_status() {
        SuccessPolicy::RequireZeroExit
    } else {
        SuccessPolicy::OutputPresence
    };
    ExecutionContext::new(config.working_dir(), config.tools_dir(), config.laws_dir())
        .with_timeout(config.timeout())
        .with_policy(policy)
}

/// Bootstraps the server using the supplied collaborators.
///
/// Loads configuration, initialises telemetry, and wires `executor` behind a
/// dispatcher bounded by the configured execution context.
///
/// # Errors
///
/// Returns [`BootstrapError`] when configuration or telemetry fails.
pub fn bootstrap_with<E>(
    loader: &dyn ConfigLoader,
    executor: E,
) -> Result<Server<E>, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    let context = execution_context(&config);
    info!(
        target: BOOTSTRAP_TARGET,
        laws_dir = %context.laws_dir(),
        tools_dir = %context.tools_dir(),
        working_dir = %context.working_dir(),
        timeout_secs = config.timeout().as_secs(),
        strict_exit_status = config.strict_exit_status(),
        "bootstrap complete"
    );

    let router = Router::new(Dispatcher::new(context, executor));
    Ok(Server::new(config, telemetry, router))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use statute_tools::ProcessExecutor;

    use super::*;

    #[test]
    fn context_mirrors_configuration() {
        let config = Config {
            laws_dir: "/srv/laws".into(),
            tools_dir: "/srv/tools".into(),
            working_dir: "/srv".into(),
            timeout_secs: 5,
            strict_exit_status: true,
            ..Config::default()
        };
        let context = execution_context(&config);
        assert_eq!(context.laws_dir(), "/srv/laws");
        assert_eq!(context.tools_dir(), "/srv/tools");
        assert_eq!(context.working_dir(), "/srv");
        assert_eq!(context.timeout(), Duration::from_secs(5));
        assert_eq!(context.policy(), SuccessPolicy::RequireZeroExit);
    }

    #[test]
    fn default_configuration_uses_output_presence() {
        let context = execution_context(&Config::default());
        assert_eq!(context.policy(), SuccessPolicy::OutputPresence);
        assert_eq!(context.laws_dir(), "/app/laws");
    }

    #[test]
    fn static_loader_rejects_invalid_configuration() {
        let loader = StaticConfigLoader::new(Config {
            timeout_secs: 0,
            ..Config::default()
        });
        let Err(error) = bootstrap_with(&loader, ProcessExecutor) else {
            panic!("zero timeout should fail bootstrap");
        };
        assert!(matches!(
            error,
            BootstrapError::Configuration {
                source: ConfigError::InvalidTimeout
            }
        ));
    }

    #[test]
    fn static_loader_rejects_oversized_timeout() {
        let loader = StaticConfigLoader::new(Config {
            timeout_secs: u64::MAX,
            ..Config::default()
        });
        let Err(error) = bootstrap_with(&loader, ProcessExecutor) else {
            panic!("oversized timeout should fail bootstrap");
        };
        assert!(matches!(
            error,
            BootstrapError::Configuration {
                source: ConfigError::TimeoutTooLarge { secs: u64::MAX }
            }
        ));
    }

    #[test]
    fn static_loader_bootstraps_server() {
        let loader = StaticConfigLoader::new(Config::default());
        let server = bootstrap_with(&loader, ProcessExecutor).expect("bootstrap");
        assert_eq!(server.config(), &Config::default());
    }
}
