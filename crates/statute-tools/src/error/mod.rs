//! Domain errors raised while validating and dispatching tool requests.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::invocation::ToolKind;

/// A request field failed its allow-list check.
///
/// Validation failures never reach an external process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The statute identifier contains characters outside `[A-Za-z0-9_]`.
    #[error("invalid law name \"{raw}\": only letters, digits, and underscore are allowed")]
    InvalidIdentifier {
        /// Value as received.
        raw: String,
    },

    /// The provision locator contains characters outside the section sign,
    /// whitespace, and word characters.
    #[error("invalid paragraph \"{raw}\": only '§', whitespace, and word characters are allowed")]
    InvalidProvision {
        /// Value as received.
        raw: String,
    },

    /// The subsection locator is neither an integer nor a bracketed list.
    #[error("invalid absatz \"{raw}\": use a number or the [1,2,3] format")]
    InvalidSubsection {
        /// Value as received.
        raw: String,
    },
}

impl ValidationError {
    /// Classifies the rejected field.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            Self::InvalidProvision { .. } => ErrorKind::InvalidProvision,
            Self::InvalidSubsection { .. } => ErrorKind::InvalidSubsection,
        }
    }
}

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The statute identifier was rejected.
    InvalidIdentifier,
    /// The provision locator was rejected.
    InvalidProvision,
    /// The subsection locator was rejected.
    InvalidSubsection,
    /// The external process exceeded its execution bound.
    ExecutionTimeout,
    /// The external process failed or could not be run.
    ExecutionFailure,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid_identifier",
            Self::InvalidProvision => "invalid_provision",
            Self::InvalidSubsection => "invalid_subsection",
            Self::ExecutionTimeout => "execution_timeout",
            Self::ExecutionFailure => "execution_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors arising from a tool request.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A request field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The tool did not complete within the execution bound and was killed.
    #[error("{tool} timed out after {}s", timeout.as_secs_f64())]
    Timeout {
        /// Tool that was running.
        tool: ToolKind,
        /// Configured execution bound.
        timeout: Duration,
    },

    /// The tool wrote only to its error stream.
    #[error("{stderr}")]
    Failure {
        /// Tool that failed.
        tool: ToolKind,
        /// Captured error-stream text.
        stderr: String,
    },

    /// The tool exited unsuccessfully under the strict exit-status policy.
    #[error("{tool} exited with status {status}: {stderr}")]
    NonZeroExit {
        /// Tool that failed.
        tool: ToolKind,
        /// Exit code, or `-1` when the process was ended by a signal.
        status: i32,
        /// Captured error-stream text.
        stderr: String,
    },

    /// The tool process could not be started.
    #[error("{tool} failed to start ({}): {source}", path.display())]
    SpawnFailed {
        /// Tool that was requested.
        tool: ToolKind,
        /// Resolved executable path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// An I/O error occurred while supervising the tool process.
    #[error("I/O error while running {tool}: {source}")]
    Io {
        /// Tool that was running.
        tool: ToolKind,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ToolError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(error) => error.kind(),
            Self::Timeout { .. } => ErrorKind::ExecutionTimeout,
            Self::Failure { .. }
            | Self::NonZeroExit { .. }
            | Self::SpawnFailed { .. }
            | Self::Io { .. } => ErrorKind::ExecutionFailure,
        }
    }

    pub(crate) fn io(tool: ToolKind, source: std::io::Error) -> Self {
        Self::Io {
            tool,
            source: Arc::new(source),
        }
    }
}
