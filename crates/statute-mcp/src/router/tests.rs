//! Unit tests for method routing.

use std::time::Duration;

use mockall::mock;
use rstest::{fixture, rstest};
use serde_json::json;

use statute_tools::{CapturedOutput, ExecutionContext, ToolError, ToolInvocation, ToolKind};

use super::*;
use crate::protocol::ResponseBody;

mock! {
    Executor {}
    impl ToolExecutor for Executor {
        fn execute(
            &self,
            context: &ExecutionContext,
            invocation: &ToolInvocation,
        ) -> Result<CapturedOutput, ToolError>;
    }
}

fn router_with(executor: MockExecutor) -> Router<MockExecutor> {
    let context = ExecutionContext::new("/app", "/app/tools", "/app/laws");
    Router::new(Dispatcher::new(context, executor))
}

#[fixture]
fn idle_router() -> Router<MockExecutor> {
    let mut executor = MockExecutor::new();
    executor.expect_execute().never();
    router_with(executor)
}

fn request(id: Option<Value>, method: &str, params: Value) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0".into(),
        id,
        method: method.into(),
        params,
    }
}

fn result_of(response: &RpcResponse) -> &Value {
    match response.body() {
        ResponseBody::Result(value) => value,
        ResponseBody::Error(error) => panic!("expected result, got error {error:?}"),
    }
}

fn error_code_of(response: &RpcResponse) -> i64 {
    match response.body() {
        ResponseBody::Error(error) => error.code,
        ResponseBody::Result(value) => panic!("expected error, got result {value}"),
    }
}

#[rstest]
#[case::echoes_supported(Some("2024-11-05"), "2024-11-05")]
#[case::echoes_newest(Some("2025-06-18"), "2025-06-18")]
#[case::unknown_gets_newest(Some("1999-01-01"), LATEST_PROTOCOL_VERSION)]
#[case::absent_gets_newest(None, LATEST_PROTOCOL_VERSION)]
fn protocol_version_negotiation(#[case] requested: Option<&str>, #[case] expected: &str) {
    assert_eq!(negotiate_protocol_version(requested), expected);
}

#[rstest]
fn initialize_reports_tools_capability(idle_router: Router<MockExecutor>) {
    let response = idle_router
        .handle(request(
            Some(json!(1)),
            "initialize",
            json!({"protocolVersion": "2025-03-26", "capabilities": {}}),
        ))
        .expect("response");
    let result = result_of(&response);
    assert_eq!(result["protocolVersion"], "2025-03-26");
    assert_eq!(result["capabilities"], json!({"tools": {}}));
    assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
}

#[rstest]
fn ping_returns_empty_object(idle_router: Router<MockExecutor>) {
    let response = idle_router
        .handle(request(Some(json!("p")), "ping", Value::Null))
        .expect("response");
    assert_eq!(response.id(), &json!("p"));
    assert_eq!(result_of(&response), &json!({}));
}

#[rstest]
fn tools_list_advertises_three_tools(idle_router: Router<MockExecutor>) {
    let response = idle_router
        .handle(request(Some(json!(2)), "tools/list", json!({})))
        .expect("response");
    let tools = result_of(&response)["tools"]
        .as_array()
        .expect("tools array");
    let names: Vec<&str> = tools
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();
    assert_eq!(names, ["download_law", "get_paragraph", "list_contents"]);
    assert!(tools.iter().all(|tool| tool["inputSchema"].is_object()));
}

#[rstest]
#[case::initialized("notifications/initialized")]
#[case::cancelled("notifications/cancelled")]
#[case::call_without_id("tools/call")]
fn notifications_get_no_response(idle_router: Router<MockExecutor>, #[case] method: &str) {
    assert!(idle_router.handle(request(None, method, json!({}))).is_none());
}

#[rstest]
fn unknown_method_is_method_not_found(idle_router: Router<MockExecutor>) {
    let response = idle_router
        .handle(request(Some(json!(3)), "resources/list", json!({})))
        .expect("response");
    assert_eq!(error_code_of(&response), -32_601);
}

#[rstest]
#[case::unknown_tool(json!({"name": "delete_law", "arguments": {}}))]
#[case::missing_name(json!({"arguments": {"law_name": "bgb"}}))]
#[case::missing_field(json!({"name": "list_contents", "arguments": {}}))]
#[case::wrong_type(json!({"name": "download_law", "arguments": {"law_name": ["bgb"]}}))]
fn malformed_calls_are_invalid_params(idle_router: Router<MockExecutor>, #[case] params: Value) {
    let response = idle_router
        .handle(request(Some(json!(4)), "tools/call", params))
        .expect("response");
    assert_eq!(error_code_of(&response), -32_602);
}

#[rstest]
fn invalid_field_is_tool_error_without_execution(idle_router: Router<MockExecutor>) {
    let result = idle_router
        .call_tool(&json!({
            "name": "get_paragraph",
            "arguments": {"paragraph": "§ 1\"; rm -rf /", "law_name": "bgb"}
        }))
        .expect("tool result");
    assert!(result.is_error());
    let text = result.content().first().expect("content").text();
    assert!(text.starts_with("invalid paragraph"), "unexpected text: {text}");
}

#[test]
fn successful_call_returns_stdout_text() {
    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .withf(|_, invocation| {
            invocation.tool() == ToolKind::ParagraphExtractor
                && invocation.args() == ["§ 70", "bgb", "[1,3]"]
        })
        .once()
        .return_once(|_, _| Ok(CapturedOutput::new("(1) ...\n(3) ...\n", "", Some(0))));
    let router = router_with(executor);

    let response = router
        .handle(request(
            Some(json!(5)),
            "tools/call",
            json!({
                "name": "get_paragraph",
                "arguments": {"paragraph": "§ 70", "law_name": "bgb", "absatz": "[1,3]"}
            }),
        ))
        .expect("response");
    assert_eq!(
        result_of(&response),
        &json!({
            "content": [{"type": "text", "text": "(1) ...\n(3) ...\n"}],
            "isError": false
        })
    );
}

#[test]
fn force_update_reaches_downloader() {
    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .withf(|_, invocation| invocation.args() == ["--force-update", "estg"])
        .once()
        .return_once(|_, _| Ok(CapturedOutput::new("Downloaded estg\n", "", Some(0))));
    let router = router_with(executor);

    let result = router
        .call_tool(&json!({
            "name": "download_law",
            "arguments": {"law_name": "estg", "force_update": true}
        }))
        .expect("tool result");
    assert!(!result.is_error());
}

#[rstest]
#[case::stderr_only(
    Ok(CapturedOutput::new("", "Error: law xyz not found\n", Some(1))),
    "Error: law xyz not found\n"
)]
#[case::timeout(
    Err(ToolError::Timeout { tool: ToolKind::TableOfContents, timeout: Duration::from_secs(30) }),
    "table-of-contents.sh timed out after 30s"
)]
fn execution_failures_are_tool_errors(
    #[case] outcome: Result<CapturedOutput, ToolError>,
    #[case] message: &str,
) {
    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .once()
        .return_once(move |_, _| outcome);
    let router = router_with(executor);

    let result = router
        .call_tool(&json!({"name": "list_contents", "arguments": {"law_name": "xyz"}}))
        .expect("tool result");
    assert!(result.is_error());
    assert_eq!(result.content().first().expect("content").text(), message);
}
