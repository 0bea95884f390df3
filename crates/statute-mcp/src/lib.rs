//! Stdio tool server for statute download, extraction, and listing.
//!
//! The server speaks line-delimited JSON-RPC 2.0 on standard input and
//! output and exposes three tools backed by external scripts:
//!
//! - `download_law` fetches a statute into the local document store.
//! - `get_paragraph` extracts one provision, optionally limited to
//!   subsections.
//! - `list_contents` prints a statute's table of contents.
//!
//! Tool arguments are decoded into typed structs, validated against the
//! allow-lists in [`statute_tools`], and only then handed to the
//! [`statute_tools::Dispatcher`]. Validation and execution failures come back
//! as tool results flagged `isError`; malformed requests come back as
//! JSON-RPC errors.
//!
//! Start-up runs through [`bootstrap_with`]: configuration is loaded via a
//! [`ConfigLoader`], telemetry is initialised once per process, and the
//! resulting [`Server`] serves until its input closes. Standard output is
//! reserved for protocol traffic, so all logging goes to standard error.

pub mod arguments;
mod bootstrap;
pub mod catalog;
pub mod protocol;
pub mod router;
mod server;
pub mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
    execution_context,
};
pub use catalog::{ToolDefinition, ToolName};
pub use protocol::{ProtocolError, RpcRequest, RpcResponse, ToolCallResult};
pub use router::Router;
pub use server::{MAX_REQUEST_BYTES, Server};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
