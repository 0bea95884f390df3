//! Request envelope parsing.
//!
//! A request line is parsed in two passes: first as arbitrary JSON (failures
//! are parse errors), then as a JSON-RPC envelope (failures are invalid
//! requests). Keeping the raw value around lets error responses echo the
//! request `id` even when the envelope is malformed.

use serde::Deserialize;
use serde_json::Value;

use super::JSONRPC_VERSION;
use super::errors::ProtocolError;

/// Parsed JSON-RPC request or notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcRequest {
    /// Protocol marker; must be `"2.0"`.
    pub jsonrpc: String,
    /// Request identifier. Absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name.
    pub method: String,
    /// Method parameters.
    #[serde(default)]
    pub params: Value,
}

/// A request line that could not be turned into an [`RpcRequest`].
#[derive(Debug, Clone)]
pub struct RejectedRequest {
    /// Identifier recovered from the raw JSON, or `null`.
    pub id: Value,
    /// Why the request was rejected.
    pub error: ProtocolError,
}

impl RpcRequest {
    /// Parses one request line.
    ///
    /// Trailing whitespace, including the line terminator, is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`RejectedRequest`] carrying [`ProtocolError::Parse`] for
    /// invalid JSON and [`ProtocolError::InvalidRequest`] for JSON that is not
    /// a JSON-RPC 2.0 envelope.
    pub fn parse(line: &[u8]) -> Result<Self, RejectedRequest> {
        let value: Value = serde_json::from_slice(line).map_err(|error| RejectedRequest {
            id: Value::Null,
            error: ProtocolError::parse(&error),
        })?;

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: Self = serde_json::from_value(value).map_err(|error| RejectedRequest {
            id: id.clone(),
            error: ProtocolError::invalid_request(error.to_string()),
        })?;

        if request.jsonrpc != JSONRPC_VERSION {
            return Err(RejectedRequest {
                id,
                error: ProtocolError::invalid_request(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                )),
            });
        }
        Ok(request)
    }

    /// Returns `true` when no response is expected.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}
