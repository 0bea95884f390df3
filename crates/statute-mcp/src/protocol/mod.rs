//! JSON-RPC 2.0 framing for the stdio tool server.
//!
//! Requests and responses are exchanged as one JSON document per line.

pub mod errors;
pub mod request;
pub mod response;

pub use errors::ProtocolError;
pub use request::{RejectedRequest, RpcRequest};
pub use response::{ResponseBody, ResponseWriter, RpcErrorObject, RpcResponse, ToolCallResult};

/// Value of the `jsonrpc` member in every message.
pub const JSONRPC_VERSION: &str = "2.0";
