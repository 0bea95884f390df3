//! Response serialisation and line framing.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use super::JSONRPC_VERSION;
use super::errors::ProtocolError;

/// Error object carried by a failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RpcErrorObject {
    /// JSON-RPC error code.
    pub code: i64,
    /// Human-readable description.
    pub message: String,
}

/// Outcome carried by a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseBody {
    /// Method result.
    Result(Value),
    /// Protocol error.
    Error(RpcErrorObject),
}

/// JSON-RPC response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(flatten)]
    body: ResponseBody,
}

impl RpcResponse {
    /// Creates a successful response.
    #[must_use]
    pub const fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            body: ResponseBody::Result(result),
        }
    }

    /// Creates an error response from a protocol error.
    #[must_use]
    pub fn error(id: Value, error: &ProtocolError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            body: ResponseBody::Error(RpcErrorObject {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }

    /// Request identifier this response answers.
    #[must_use]
    pub const fn id(&self) -> &Value {
        &self.id
    }

    /// Result or error payload.
    #[must_use]
    pub const fn body(&self) -> &ResponseBody {
        &self.body
    }
}

/// One content block of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl TextContent {
    /// Text carried by the block.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Result of a `tools/call` request.
///
/// Tool failures are reported here with `isError` set rather than as a
/// JSON-RPC error, so the caller can show the message to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    content: Vec<TextContent>,
    is_error: bool,
}

impl ToolCallResult {
    /// Successful tool output.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_flag(text.into(), false)
    }

    /// Failed tool call carrying the failure message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_flag(message.into(), true)
    }

    fn with_flag(text: String, is_error: bool) -> Self {
        Self {
            content: vec![TextContent { kind: "text", text }],
            is_error,
        }
    }

    /// Content blocks.
    #[must_use]
    pub fn content(&self) -> &[TextContent] {
        &self.content
    }

    /// Whether the call failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_error
    }
}

/// Writer that frames responses as single JSON lines.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a writer over the given output stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Serialises `response` and writes it as one line, then flushes.
    ///
    /// The line is assembled in memory first so a partial write never
    /// interleaves with another response.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Serialise`] or [`ProtocolError::Io`].
    pub fn write_response(&mut self, response: &RpcResponse) -> Result<(), ProtocolError> {
        let mut line = serde_json::to_vec(response)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Consumes the writer and returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
