//! Shared configuration for the statute tool server.
//!
//! Configuration is resolved once at start-up from built-in defaults,
//! environment variables, and command-line flags (in increasing order of
//! precedence). The resulting [`Config`] is passed explicitly to the
//! dispatcher so no component reads process-wide state at invocation time.

mod defaults;
mod logging;

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use clap::error::ErrorKind;
use thiserror::Error;

pub use defaults::{
    DEFAULT_LAWS_DIR, DEFAULT_LOG_FILTER, DEFAULT_TIMEOUT_SECS, DEFAULT_TOOLS_DIR,
    DEFAULT_WORKING_DIR, MAX_TIMEOUT_SECS, default_laws_dir, default_log_filter,
    default_log_filter_string, default_log_format, default_tools_dir, default_working_dir,
};
pub use logging::LogFormat;

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "statute-mcp",
    version,
    about = "Serves statute download, extraction, and listing tools over stdio"
)]
pub struct Config {
    /// Root of the statute document store handed to every tool invocation.
    #[arg(long, env = "LAWS_DIR", default_value = DEFAULT_LAWS_DIR)]
    pub laws_dir: Utf8PathBuf,

    /// Directory containing the download, extraction, and listing scripts.
    #[arg(long, env = "STATUTE_TOOLS_DIR", default_value = DEFAULT_TOOLS_DIR)]
    pub tools_dir: Utf8PathBuf,

    /// Working directory for tool invocations.
    #[arg(long, env = "STATUTE_WORKING_DIR", default_value = DEFAULT_WORKING_DIR)]
    pub working_dir: Utf8PathBuf,

    /// Seconds a tool invocation may run before it is terminated.
    #[arg(long, env = "STATUTE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Treat a non-zero exit status as a failure even when stdout has content.
    #[arg(long, env = "STATUTE_STRICT_EXIT_STATUS")]
    pub strict_exit_status: bool,

    /// Tracing filter expression (for example `info` or `statute_tools=debug`).
    #[arg(long, env = "STATUTE_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Log output format: `json` or `compact`.
    #[arg(long, env = "STATUTE_LOG_FORMAT", default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            laws_dir: default_laws_dir(),
            tools_dir: default_tools_dir(),
            working_dir: default_working_dir(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            strict_exit_status: false,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Command-line or environment parsing failed, or help/version was
    /// requested.
    #[error("{0}")]
    Cli(#[source] Arc<clap::Error>),

    /// The execution bound was zero.
    #[error("timeout must be at least one second")]
    InvalidTimeout,

    /// The execution bound exceeded [`MAX_TIMEOUT_SECS`].
    #[error("timeout of {secs}s exceeds the limit of {max}s", max = MAX_TIMEOUT_SECS)]
    TimeoutTooLarge {
        /// Seconds that were requested.
        secs: u64,
    },

    /// The tools directory was given as a relative path.
    #[error("tools directory must be an absolute path, got '{path}'")]
    RelativeToolsDir {
        /// Path that was rejected.
        path: Utf8PathBuf,
    },
}

impl ConfigError {
    /// Returns `true` when the error carries help or version output rather
    /// than a genuine failure.
    #[must_use]
    pub fn is_informational(&self) -> bool {
        match self {
            Self::Cli(error) => matches!(
                error.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ),
            Self::InvalidTimeout
            | Self::TimeoutTooLarge { .. }
            | Self::RelativeToolsDir { .. } => false,
        }
    }

    /// Writes the error for an operator. Help and version output go to
    /// stdout with clap's formatting; everything else goes to stderr.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while writing.
    pub fn print(&self) -> io::Result<()> {
        match self {
            Self::Cli(error) => error.print(),
            Self::InvalidTimeout
            | Self::TimeoutTooLarge { .. }
            | Self::RelativeToolsDir { .. } => {
                writeln!(io::stderr().lock(), "error: {self}")
            }
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_iter(std::env::args_os())
    }

    /// Loads configuration from an explicit argument vector. The first item is
    /// treated as the program name. Environment variables still apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn load_from_iter<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let config =
            Self::try_parse_from(args).map_err(|error| ConfigError::Cli(Arc::new(error)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that the parser cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTimeout`] for a zero timeout,
    /// [`ConfigError::TimeoutTooLarge`] above [`MAX_TIMEOUT_SECS`], and
    /// [`ConfigError::RelativeToolsDir`] when the tools directory is relative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::TimeoutTooLarge {
                secs: self.timeout_secs,
            });
        }
        if !self.tools_dir.is_absolute() {
            return Err(ConfigError::RelativeToolsDir {
                path: self.tools_dir.clone(),
            });
        }
        Ok(())
    }

    /// Statute document store root.
    #[must_use]
    pub fn laws_dir(&self) -> &Utf8Path {
        self.laws_dir.as_path()
    }

    /// Directory containing the tool scripts.
    #[must_use]
    pub fn tools_dir(&self) -> &Utf8Path {
        self.tools_dir.as_path()
    }

    /// Working directory for tool invocations.
    #[must_use]
    pub fn working_dir(&self) -> &Utf8Path {
        self.working_dir.as_path()
    }

    /// Execution bound for a single tool invocation.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether a non-zero exit status overrides the presence of stdout.
    #[must_use]
    pub const fn strict_exit_status(&self) -> bool {
        self.strict_exit_status
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
