//! Normalisation of captured process output into a single result.

use serde::Serialize;

use crate::context::SuccessPolicy;
use crate::error::ToolError;
use crate::invocation::ToolKind;

/// Raw streams and exit status of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Decoded standard output.
    pub stdout: String,
    /// Decoded standard error.
    pub stderr: String,
    /// Exit code, or `None` when the process was ended by a signal.
    pub status: Option<i32>,
}

impl CapturedOutput {
    /// Creates a capture from both streams and an exit code.
    #[must_use]
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, status: Option<i32>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            status,
        }
    }

    /// Returns `true` for a zero exit code.
    #[must_use]
    pub const fn exited_successfully(&self) -> bool {
        matches!(self.status, Some(0))
    }
}

/// Outcome of a completed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    text: String,
    success: bool,
}

impl ExecutionResult {
    /// Successful result carrying `text`.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    /// Result text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the invocation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Consumes the result and returns its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Applies the result rules to a finished process.
    ///
    /// - Non-empty stdout is the result, regardless of exit status, unless
    ///   `policy` is [`SuccessPolicy::RequireZeroExit`] and the process
    ///   exited unsuccessfully.
    /// - Otherwise non-empty stderr is a [`ToolError::Failure`].
    /// - Otherwise the result is an empty success.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Failure`] for stderr-only output and
    /// [`ToolError::NonZeroExit`] under the strict policy.
    pub fn from_captured(
        tool: ToolKind,
        captured: CapturedOutput,
        policy: SuccessPolicy,
    ) -> Result<Self, ToolError> {
        if policy == SuccessPolicy::RequireZeroExit && !captured.exited_successfully() {
            return Err(ToolError::NonZeroExit {
                tool,
                status: captured.status.unwrap_or(-1),
                stderr: captured.stderr,
            });
        }

        if !captured.stdout.is_empty() {
            return Ok(Self::success(captured.stdout));
        }

        if !captured.stderr.is_empty() {
            return Err(ToolError::Failure {
                tool,
                stderr: captured.stderr,
            });
        }

        Ok(Self::success(String::new()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const TOOL: ToolKind = ToolKind::ParagraphExtractor;

    #[rstest]
    #[case::clean_exit(Some(0))]
    #[case::failing_exit(Some(1))]
    #[case::signalled(None)]
    fn stdout_wins_under_output_presence(#[case] status: Option<i32>) {
        let captured = CapturedOutput::new("§ 1 text\n", "warning: cached\n", status);
        let result = ExecutionResult::from_captured(TOOL, captured, SuccessPolicy::OutputPresence)
            .expect("stdout is success");
        assert!(result.is_success());
        assert_eq!(result.text(), "§ 1 text\n");
    }

    #[test]
    fn stderr_only_is_failure_with_detail() {
        let captured = CapturedOutput::new("", "law not found\n", Some(0));
        let error = ExecutionResult::from_captured(TOOL, captured, SuccessPolicy::OutputPresence)
            .expect_err("stderr only");
        match error {
            ToolError::Failure { tool, stderr } => {
                assert_eq!(tool, TOOL);
                assert_eq!(stderr, "law not found\n");
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[rstest]
    #[case::clean_exit(Some(0))]
    #[case::failing_exit(Some(3))]
    fn no_output_is_empty_success(#[case] status: Option<i32>) {
        let captured = CapturedOutput::new("", "", status);
        let result = ExecutionResult::from_captured(TOOL, captured, SuccessPolicy::OutputPresence)
            .expect("empty success");
        assert!(result.is_success());
        assert_eq!(result.text(), "");
    }

    #[test]
    fn whitespace_only_stdout_still_counts_as_output() {
        let captured = CapturedOutput::new("\n", "noise", Some(0));
        let result = ExecutionResult::from_captured(TOOL, captured, SuccessPolicy::OutputPresence)
            .expect("success");
        assert_eq!(result.into_text(), "\n");
    }

    #[rstest]
    #[case::failing_exit(Some(2), 2)]
    #[case::signalled(None, -1)]
    fn strict_policy_rejects_unsuccessful_exit(
        #[case] status: Option<i32>,
        #[case] expected_status: i32,
    ) {
        let captured = CapturedOutput::new("partial", "died", status);
        let error = ExecutionResult::from_captured(TOOL, captured, SuccessPolicy::RequireZeroExit)
            .expect_err("strict failure");
        match error {
            ToolError::NonZeroExit { status, stderr, .. } => {
                assert_eq!(status, expected_status);
                assert_eq!(stderr, "died");
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[test]
    fn strict_policy_accepts_clean_exit() {
        let captured = CapturedOutput::new("ok", "", Some(0));
        let result = ExecutionResult::from_captured(TOOL, captured, SuccessPolicy::RequireZeroExit)
            .expect("success");
        assert_eq!(result.text(), "ok");
    }
}
