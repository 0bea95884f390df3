//! Crate-level integration and BDD tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::context::ExecutionContext;
use crate::dispatcher::{Dispatcher, ToolExecutor};
use crate::error::ToolError;
use crate::invocation::ToolInvocation;
use crate::operation::OperationRequest;
use crate::outcome::CapturedOutput;


/// What a [`RecordingExecutor`] answers with.
#[derive(Debug, Clone, Default)]
enum Reply {
    #[default]
    Empty,
    Stdout(String),
    Stderr(String),
    Timeout,
}

/// Executor that records every invocation and replies with a fixed outcome.
#[derive(Debug, Clone, Default)]
struct RecordingExecutor {
    reply: Reply,
    calls: Rc<RefCell<Vec<ToolInvocation>>>,
}

impl RecordingExecutor {
    fn replying(reply: Reply) -> Self {
        Self {
            reply,
            calls: Rc::default(),
        }
    }

    fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.borrow().clone()
    }
}

impl ToolExecutor for RecordingExecutor {
    fn execute(
        &self,
        context: &ExecutionContext,
        invocation: &ToolInvocation,
    ) -> Result<CapturedOutput, ToolError> {
        self.calls.borrow_mut().push(invocation.clone());
        match &self.reply {
            Reply::Empty => Ok(CapturedOutput::new("", "", Some(0))),
            Reply::Stdout(text) => Ok(CapturedOutput::new(text.clone(), "", Some(0))),
            Reply::Stderr(text) => Ok(CapturedOutput::new("", text.clone(), Some(1))),
            Reply::Timeout => Err(ToolError::Timeout {
                tool: invocation.tool(),
                timeout: context.timeout(),
            }),
        }
    }
}

fn test_context() -> ExecutionContext {
    ExecutionContext::new("/app", "/app/tools", "/app/laws").with_timeout(Duration::from_secs(1))
}

#[test]
fn end_to_end_dispatch_with_recording_executor() {
    let executor = RecordingExecutor::replying(Reply::Stdout("§ 1\n§ 2\n".into()));
    let dispatcher = Dispatcher::new(test_context(), executor.clone());

    let request = OperationRequest::list_contents("bgb").expect("valid");
    let result = dispatcher.dispatch(&request).expect("dispatch");
    assert_eq!(result.text(), "§ 1\n§ 2\n");

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args(), ["bgb"]);
}

#[test]
fn empty_reply_is_empty_success() {
    let dispatcher = Dispatcher::new(test_context(), RecordingExecutor::default());
    let request = OperationRequest::download("bgb", false).expect("valid");
    let result = dispatcher.dispatch(&request).expect("dispatch");
    assert!(result.is_success());
    assert!(result.text().is_empty());
}
