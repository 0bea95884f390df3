//! Error types for JSON-RPC transport failures.
//!
//! These errors describe problems with the request envelope itself and are
//! answered with a JSON-RPC `error` object. Failures of a tool call (invalid
//! fields, timeouts, tool errors) are not protocol errors: they are reported
//! inside a successful response as a tool result flagged `isError`.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32_700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i64 = -32_600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32_601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i64 = -32_602;
/// Internal server error.
pub const INTERNAL_ERROR: i64 = -32_603;

/// Errors surfaced while reading, routing, or answering a request.
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    /// The request line is not valid JSON.
    #[error("parse error: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },

    /// The JSON does not form a valid request envelope.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// What was wrong with the envelope.
        message: String,
    },

    /// The request line exceeds the accepted size.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes read before the line was abandoned.
        size: usize,
        /// Accepted maximum.
        max_size: usize,
    },

    /// The method is not served.
    #[error("method not found: {method}")]
    MethodNotFound {
        /// Method name as received.
        method: String,
    },

    /// The parameters do not match the method's schema.
    #[error("invalid params: {message}")]
    InvalidParams {
        /// What was wrong with the parameters.
        message: String,
    },

    /// A tool call named a tool that is not served.
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// Tool name as received.
        name: String,
    },

    /// Reading requests or writing responses failed.
    #[error("I/O error: {0}")]
    Io(#[source] Arc<io::Error>),

    /// A response could not be serialised.
    #[error("failed to serialise response: {0}")]
    Serialise(#[source] Arc<serde_json::Error>),
}

impl ProtocolError {
    /// Returns the JSON-RPC error code for this error.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Parse { .. } => PARSE_ERROR,
            Self::InvalidRequest { .. } | Self::RequestTooLarge { .. } => INVALID_REQUEST,
            Self::MethodNotFound { .. } => METHOD_NOT_FOUND,
            Self::InvalidParams { .. } | Self::UnknownTool { .. } => INVALID_PARAMS,
            Self::Io(_) | Self::Serialise(_) => INTERNAL_ERROR,
        }
    }

    /// Creates a parse error from a serde error.
    #[must_use]
    pub fn parse(source: &serde_json::Error) -> Self {
        Self::Parse {
            message: source.to_string(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a request too large error.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Creates a method not found error.
    #[must_use]
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    /// Creates an invalid params error.
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Creates an unknown tool error.
    #[must_use]
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(error: io::Error) -> Self {
        Self::Io(Arc::new(error))
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialise(Arc::new(error))
    }
}
