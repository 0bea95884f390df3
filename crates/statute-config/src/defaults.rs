//! Built-in configuration defaults.

use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Document store root used when `LAWS_DIR` is absent.
pub const DEFAULT_LAWS_DIR: &str = "/app/laws";

/// Directory holding the download, extraction, and listing scripts.
pub const DEFAULT_TOOLS_DIR: &str = "/app/tools";

/// Working directory for every tool invocation.
pub const DEFAULT_WORKING_DIR: &str = "/app";

/// Upper bound on the runtime of a single tool invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Largest accepted execution bound, one day.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default document store root as an owned path.
#[must_use]
pub fn default_laws_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_LAWS_DIR)
}

/// Default tools directory as an owned path.
#[must_use]
pub fn default_tools_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_TOOLS_DIR)
}

/// Default working directory as an owned path.
#[must_use]
pub fn default_working_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_WORKING_DIR)
}

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
