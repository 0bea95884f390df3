//! Validation and safe dispatch of statute tool requests.
//!
//! The `statute-tools` crate sits between an untrusted request surface and
//! three external shell tools that fetch statute documents, extract single
//! provisions, and list a statute's table of contents. Every caller-supplied
//! field passes a strict allow-list check before it can reach a process, and
//! every process runs under a fixed execution bound with both output streams
//! captured.
//!
//! # Architecture
//!
//! Requests flow through four stages:
//!
//! 1. The validators in [`validate`] turn raw strings into
//!    [`LawIdentifier`], [`ProvisionLocator`], and [`SubsectionLocator`]
//!    values. An [`OperationRequest`] can only be built from these.
//! 2. [`OperationRequest::invocation`] maps the request to a
//!    [`ToolInvocation`]: one executable and a discrete argument vector.
//! 3. A [`ToolExecutor`] runs the invocation inside an
//!    [`ExecutionContext`]. [`ProcessExecutor`] is the production
//!    implementation and never routes arguments through a shell.
//! 4. [`ExecutionResult::from_captured`] normalises the captured streams
//!    into a success carrying text or a [`ToolError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use statute_tools::{Dispatcher, ExecutionContext, OperationRequest, ProcessExecutor};
//!
//! let context = ExecutionContext::new("/app", "/app/tools", "/app/laws");
//! let dispatcher = Dispatcher::new(context, ProcessExecutor);
//!
//! let request = OperationRequest::get_paragraph("§ 70", "bgb", Some("[1,3]"))
//!     .expect("fields are valid");
//! match dispatcher.dispatch(&request) {
//!     Ok(result) => println!("{}", result.text()),
//!     Err(error) => eprintln!("{}: {error}", error.kind()),
//! }
//! ```

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod invocation;
pub mod operation;
pub mod outcome;
pub mod process;
pub mod validate;

#[cfg(test)]
mod tests;

pub use self::context::{DEFAULT_TIMEOUT, ExecutionContext, STORE_ENV_VAR, SuccessPolicy};
pub use self::dispatcher::{Dispatcher, ToolExecutor};
pub use self::error::{ErrorKind, ToolError, ValidationError};
pub use self::invocation::{FORCE_UPDATE_FLAG, ToolInvocation, ToolKind};
pub use self::operation::{Operation, OperationRequest};
pub use self::outcome::{CapturedOutput, ExecutionResult};
pub use self::process::ProcessExecutor;
pub use self::validate::{
    LawIdentifier, ProvisionLocator, SubsectionLocator, validate_law_identifier,
    validate_provision, validate_subsection,
};
