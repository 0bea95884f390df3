//! Dispatcher turning validated requests into bounded tool invocations.
//!
//! The [`Dispatcher`] is the public-facing API the protocol server calls. It
//! maps each [`OperationRequest`] to exactly one [`ToolInvocation`], hands it
//! to a [`ToolExecutor`] together with the process-wide
//! [`ExecutionContext`], and normalises the captured output into an
//! [`ExecutionResult`].
//!
//! The executor abstraction enables test doubles that return pre-configured
//! output without spawning real processes. The dispatcher keeps no state
//! between requests, so one instance can serve concurrent callers.

use tracing::{debug, warn};

use crate::context::ExecutionContext;
use crate::error::ToolError;
use crate::invocation::ToolInvocation;
use crate::operation::OperationRequest;
use crate::outcome::{CapturedOutput, ExecutionResult};
use crate::validate::{LawIdentifier, ProvisionLocator, SubsectionLocator};

/// Tracing target for dispatch operations.
const DISPATCH_TARGET: &str = "statute_tools::dispatch";

/// Trait abstracting tool process execution for testability.
///
/// The production implementation is
/// [`ProcessExecutor`](crate::process::ProcessExecutor). Test code can
/// implement this trait to inject pre-configured output.
///
/// # Example
///
/// ```
/// use statute_tools::{CapturedOutput, ExecutionContext, ToolError, ToolExecutor, ToolInvocation};
///
/// struct EchoExecutor;
///
/// impl ToolExecutor for EchoExecutor {
///     fn execute(
///         &self,
///         _context: &ExecutionContext,
///         invocation: &ToolInvocation,
///     ) -> Result<CapturedOutput, ToolError> {
///         Ok(CapturedOutput::new(invocation.args().join(" "), "", Some(0)))
///     }
/// }
/// ```
pub trait ToolExecutor {
    /// Runs `invocation` under the bounds in `context` and returns the
    /// captured streams.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolError`] if the tool cannot be spawned, overruns the
    /// execution bound, or its streams cannot be read.
    fn execute(
        &self,
        context: &ExecutionContext,
        invocation: &ToolInvocation,
    ) -> Result<CapturedOutput, ToolError>;
}

/// Maps validated requests to tool invocations and normalises their output.
///
/// # Example
///
/// ```
/// use statute_tools::{
///     CapturedOutput, Dispatcher, ExecutionContext, OperationRequest, ToolError,
///     ToolExecutor, ToolInvocation,
/// };
///
/// struct FixedExecutor;
/// impl ToolExecutor for FixedExecutor {
///     fn execute(
///         &self,
///         _context: &ExecutionContext,
///         _invocation: &ToolInvocation,
///     ) -> Result<CapturedOutput, ToolError> {
///         Ok(CapturedOutput::new("§ 1 Beginn der Rechtsfähigkeit\n", "", Some(0)))
///     }
/// }
///
/// let context = ExecutionContext::new("/app", "/app/tools", "/app/laws");
/// let dispatcher = Dispatcher::new(context, FixedExecutor);
/// let request = OperationRequest::get_paragraph("§ 1", "bgb", None).expect("valid request");
/// let result = dispatcher.dispatch(&request).expect("dispatch succeeds");
/// assert!(result.is_success());
/// ```
#[derive(Debug)]
pub struct Dispatcher<E> {
    context: ExecutionContext,
    executor: E,
}

impl<E> Dispatcher<E> {
    /// Creates a dispatcher with the given bounds and executor.
    #[must_use]
    pub const fn new(context: ExecutionContext, executor: E) -> Self {
        Self { context, executor }
    }

    /// Returns the execution bounds applied to every invocation.
    #[must_use]
    pub const fn context(&self) -> &ExecutionContext {
        &self.context
    }
}

impl<E: ToolExecutor> Dispatcher<E> {
    /// Runs the tool for `request` and normalises its output.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Timeout`] when the tool overruns the execution
    /// bound, [`ToolError::Failure`] when it writes only to its error stream,
    /// or any other error produced by the executor.
    pub fn dispatch(&self, request: &OperationRequest) -> Result<ExecutionResult, ToolError> {
        let invocation = request.invocation();
        debug!(
            target: DISPATCH_TARGET,
            operation = %request.operation(),
            law = %request.law(),
            tool = %invocation.tool(),
            arg_count = invocation.args().len(),
            "dispatching request"
        );

        let outcome = self
            .executor
            .execute(&self.context, &invocation)
            .and_then(|captured| {
                ExecutionResult::from_captured(invocation.tool(), captured, self.context.policy())
            });

        if let Err(error) = &outcome {
            warn!(
                target: DISPATCH_TARGET,
                operation = %request.operation(),
                kind = %error.kind(),
                %error,
                "request failed"
            );
        }
        outcome
    }

    /// Fetches a statute document, replacing a local copy when
    /// `force_refresh` is set.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn download(
        &self,
        law: &LawIdentifier,
        force_refresh: bool,
    ) -> Result<ExecutionResult, ToolError> {
        self.dispatch(&OperationRequest::Download {
            law: law.clone(),
            force_refresh,
        })
    }

    /// Extracts a provision, narrowed to `subsection` when given.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn get_paragraph(
        &self,
        provision: &ProvisionLocator,
        law: &LawIdentifier,
        subsection: Option<&SubsectionLocator>,
    ) -> Result<ExecutionResult, ToolError> {
        self.dispatch(&OperationRequest::GetParagraph {
            provision: provision.clone(),
            law: law.clone(),
            subsection: subsection.cloned(),
        })
    }

    /// Lists every provision of a statute in document order.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::dispatch`].
    pub fn list_contents(&self, law: &LawIdentifier) -> Result<ExecutionResult, ToolError> {
        self.dispatch(&OperationRequest::ListContents { law: law.clone() })
    }
}
