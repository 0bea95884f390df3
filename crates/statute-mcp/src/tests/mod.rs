//! Crate-level test doubles and behavioural tests.

use std::io::Cursor;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;

use statute_config::Config;
use statute_tools::{
    CapturedOutput, Dispatcher, ExecutionContext, ToolError, ToolExecutor, ToolInvocation,
};

use crate::router::Router;
use crate::server::Server;
use crate::telemetry::TelemetryHandle;


/// What a [`StubExecutor`] answers with.
#[derive(Debug, Clone, Default)]
pub(crate) enum Reply {
    #[default]
    Empty,
    Stdout(String),
    Stderr(String),
    Timeout,
}

/// Thread-safe executor that records invocations and replies with a fixed
/// outcome.
#[derive(Debug, Clone, Default)]
pub(crate) struct StubExecutor {
    reply: Reply,
    calls: Arc<Mutex<Vec<ToolInvocation>>>,
}

impl StubExecutor {
    pub(crate) fn replying(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<ToolInvocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ToolExecutor for StubExecutor {
    fn execute(
        &self,
        context: &ExecutionContext,
        invocation: &ToolInvocation,
    ) -> Result<CapturedOutput, ToolError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());
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

pub(crate) fn server_with(executor: StubExecutor) -> Server<StubExecutor> {
    let context = ExecutionContext::new("/app", "/app/tools", "/app/laws")
        .with_timeout(Duration::from_secs(30));
    let router = Router::new(Dispatcher::new(context, executor));
    Server::new(Config::default(), TelemetryHandle, router)
}

/// Feeds `input` to `server` and returns every response line as JSON.
pub(crate) fn exchange(server: &Server<StubExecutor>, input: &[u8]) -> Vec<Value> {
    let mut output = Vec::new();
    server
        .serve(Cursor::new(input.to_vec()), &mut output)
        .expect("serve until end of input");
    String::from_utf8(output)
        .expect("responses are UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("response is JSON"))
        .collect()
}

/// Picks the response with the given `id` regardless of completion order.
pub(crate) fn response_for<'a>(responses: &'a [Value], id: &Value) -> &'a Value {
    responses
        .iter()
        .find(|response| response.get("id") == Some(id))
        .unwrap_or_else(|| panic!("no response with id {id}"))
}

#[test]
fn session_answers_initialize_list_and_call() {
    let executor = StubExecutor::replying(Reply::Stdout("I. Buch\n".into()));
    let server = server_with(executor.clone());
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"list_contents","arguments":{"law_name":"bgb"}}}"#,
        "\n",
    );

    let responses = exchange(&server, input.as_bytes());
    assert_eq!(responses.len(), 3);

    let initialize = response_for(&responses, &Value::from(1));
    assert_eq!(initialize["result"]["protocolVersion"], "2024-11-05");

    let listing = response_for(&responses, &Value::from(2));
    assert_eq!(listing["result"]["tools"].as_array().map(Vec::len), Some(3));

    let call = response_for(&responses, &Value::from(3));
    assert_eq!(call["result"]["content"][0]["text"], "I. Buch\n");
    assert_eq!(call["result"]["isError"], false);

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls.first().expect("one call").args(), ["bgb"]);
}
