//! Execution bounds shared by every tool invocation.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use crate::invocation::ToolKind;

/// Environment variable that tells the tools where the document store lives.
pub const STORE_ENV_VAR: &str = "LAWS_DIR";

/// Default execution bound for one invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How a finished process is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// Standard output content means success whatever the exit status.
    /// Tolerates tools that do not set exit codes reliably.
    #[default]
    OutputPresence,
    /// A non-zero exit status is a failure even when stdout has content.
    RequireZeroExit,
}

/// Process-wide settings applied to every invocation.
///
/// None of these values are request-controllable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    working_dir: Utf8PathBuf,
    tools_dir: Utf8PathBuf,
    laws_dir: Utf8PathBuf,
    timeout: Duration,
    policy: SuccessPolicy,
}

impl ExecutionContext {
    /// Creates a context with the default timeout and success policy.
    #[must_use]
    pub fn new(
        working_dir: impl Into<Utf8PathBuf>,
        tools_dir: impl Into<Utf8PathBuf>,
        laws_dir: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            tools_dir: tools_dir.into(),
            laws_dir: laws_dir.into(),
            timeout: DEFAULT_TIMEOUT,
            policy: SuccessPolicy::default(),
        }
    }

    /// Overrides the execution bound.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the success policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SuccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Working directory of every invocation.
    #[must_use]
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }

    /// Directory holding the tool executables.
    #[must_use]
    pub fn tools_dir(&self) -> &Utf8Path {
        &self.tools_dir
    }

    /// Document store root exported as [`STORE_ENV_VAR`].
    #[must_use]
    pub fn laws_dir(&self) -> &Utf8Path {
        &self.laws_dir
    }

    /// Execution bound.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Success policy.
    #[must_use]
    pub const fn policy(&self) -> SuccessPolicy {
        self.policy
    }

    /// Absolute path of the executable implementing `tool`.
    #[must_use]
    pub fn executable(&self, tool: ToolKind) -> Utf8PathBuf {
        self.tools_dir.join(tool.executable_name())
    }
}
