//! Method routing for the tool server.
//!
//! The router answers the lifecycle and discovery methods directly and turns
//! `tools/call` requests into validated dispatcher requests. Protocol-level
//! problems become JSON-RPC errors; anything that goes wrong with the tool
//! call itself becomes a tool result flagged `isError`.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use statute_tools::{Dispatcher, ToolExecutor};

use crate::arguments::{CallParams, ToolArguments};
use crate::catalog::{ToolDefinition, ToolName, definitions};
use crate::protocol::{ProtocolError, RpcRequest, RpcResponse, ToolCallResult};

/// Tracing target for routing.
pub(crate) const ROUTER_TARGET: &str = "statute_mcp::router";

/// Newest protocol revision this server speaks.
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// Protocol revisions accepted during `initialize`, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] =
    [LATEST_PROTOCOL_VERSION, "2025-03-26", "2024-11-05"];

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Version reported in `serverInfo`.
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Picks the revision to answer `initialize` with.
///
/// A supported client revision is echoed; anything else gets the newest.
#[must_use]
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|version| {
            SUPPORTED_PROTOCOL_VERSIONS
                .into_iter()
                .find(|supported| *supported == version)
        })
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}

#[derive(Serialize)]
struct ToolList {
    tools: Vec<ToolDefinition>,
}

/// Routes parsed requests to their handlers.
#[derive(Debug)]
pub struct Router<E> {
    dispatcher: Dispatcher<E>,
}

impl<E> Router<E> {
    /// Creates a router that runs tool calls through `dispatcher`.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher<E>) -> Self {
        Self { dispatcher }
    }

    /// Dispatcher used for tool calls.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<E> {
        &self.dispatcher
    }
}

impl<E: ToolExecutor> Router<E> {
    /// Handles one request and returns the response to send, if any.
    ///
    /// Notifications never produce a response.
    pub fn handle(&self, request: RpcRequest) -> Option<RpcResponse> {
        let RpcRequest {
            id, method, params, ..
        } = request;
        let Some(request_id) = id else {
            debug!(target: ROUTER_TARGET, %method, "notification received");
            return None;
        };

        debug!(target: ROUTER_TARGET, %method, id = %request_id, "routing request");
        let outcome = match method.as_str() {
            "initialize" => Ok(initialize_result(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => to_value(&ToolList {
                tools: definitions(),
            }),
            "tools/call" => self.call_tool(&params).and_then(|result| to_value(&result)),
            other => Err(ProtocolError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => RpcResponse::result(request_id, result),
            Err(error) => {
                warn!(
                    target: ROUTER_TARGET,
                    %method,
                    code = error.code(),
                    %error,
                    "request rejected"
                );
                RpcResponse::error(request_id, &error)
            }
        })
    }

    /// Runs a `tools/call` request.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidParams`] or
    /// [`ProtocolError::UnknownTool`] when the call cannot be decoded.
    /// Validation and execution failures are returned as a tool result with
    /// its error flag set.
    pub fn call_tool(&self, params: &Value) -> Result<ToolCallResult, ProtocolError> {
        let call = CallParams::from_params(params)?;
        let tool: ToolName = call.name.parse()?;
        let arguments = ToolArguments::parse(tool, call.arguments)?;

        let request = match arguments.into_request() {
            Ok(request) => request,
            Err(error) => {
                warn!(
                    target: ROUTER_TARGET,
                    %tool,
                    kind = %error.kind(),
                    %error,
                    "tool arguments rejected"
                );
                return Ok(ToolCallResult::error(error.to_string()));
            }
        };

        Ok(match self.dispatcher.dispatch(&request) {
            Ok(result) => ToolCallResult::text(result.into_text()),
            Err(error) => ToolCallResult::error(error.to_string()),
        })
    }
}

fn initialize_result(params: &Value) -> Value {
    let requested = params.get("protocolVersion").and_then(Value::as_str);
    json!({
        "protocolVersion": negotiate_protocol_version(requested),
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
        },
    })
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(value).map_err(ProtocolError::from)
}

#[cfg(test)]
mod tests;
