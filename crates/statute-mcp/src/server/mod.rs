//! Line-delimited JSON-RPC server loop.
//!
//! The server reads one request per line from its input and writes one
//! response per line to its output. Lifecycle and discovery requests are
//! answered inline. Each `tools/call` with an `id` runs on its own scoped
//! thread so a slow external tool never holds up other requests; responses
//! are written whole under a mutex in completion order. End of input waits
//! for in-flight calls before returning.

use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};
use std::thread;

use serde_json::Value;
use tracing::{debug, info, warn};

use statute_config::Config;
use statute_tools::ToolExecutor;

use crate::protocol::{ProtocolError, ResponseWriter, RpcRequest, RpcResponse};
use crate::router::Router;
use crate::telemetry::TelemetryHandle;

/// Maximum size of a single request line in bytes, terminator included.
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Tracing target for the server loop.
pub(crate) const SERVER_TARGET: &str = "statute_mcp::server";

const TOOLS_CALL: &str = "tools/call";

/// Running tool server.
#[derive(Debug)]
pub struct Server<E> {
    config: Config,
    telemetry: TelemetryHandle,
    router: Router<E>,
}

impl<E> Server<E> {
    /// Assembles a server from its bootstrapped parts.
    #[must_use]
    pub const fn new(config: Config, telemetry: TelemetryHandle, router: Router<E>) -> Self {
        Self {
            config,
            telemetry,
            router,
        }
    }

    /// Configuration the server was started with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Telemetry handle kept alive for the server's lifetime.
    #[must_use]
    pub const fn telemetry(&self) -> &TelemetryHandle {
        &self.telemetry
    }

    /// Request router.
    #[must_use]
    pub const fn router(&self) -> &Router<E> {
        &self.router
    }
}

impl<E: ToolExecutor + Sync> Server<E> {
    /// Serves requests from `reader` until end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Io`] when reading requests fails, and
    /// propagates failures to write an inline response. Write failures on a
    /// tool-call thread are logged and do not stop the loop.
    pub fn serve<R, W>(&self, mut reader: R, output: W) -> Result<(), ProtocolError>
    where
        R: BufRead,
        W: Write + Send,
    {
        let writer = Mutex::new(ResponseWriter::new(output));
        info!(target: SERVER_TARGET, "serving requests");

        thread::scope(|scope| -> Result<(), ProtocolError> {
            while let Some(line) = read_bounded_line(&mut reader)? {
                let Some(request) = accept(line, &writer)? else {
                    continue;
                };

                if request.method == TOOLS_CALL && !request.is_notification() {
                    let shared = &writer;
                    scope.spawn(move || {
                        if let Some(response) = self.router.handle(request)
                            && let Err(error) = respond(shared, &response)
                        {
                            warn!(target: SERVER_TARGET, %error, "failed to write tool result");
                        }
                    });
                } else if let Some(response) = self.router.handle(request) {
                    respond(&writer, &response)?;
                }
            }
            debug!(target: SERVER_TARGET, "end of input, waiting for in-flight calls");
            Ok(())
        })?;

        info!(target: SERVER_TARGET, "input closed");
        Ok(())
    }
}

/// Turns a raw line into a request, answering lines that cannot be one.
fn accept<W: Write>(
    line: Line,
    writer: &Mutex<ResponseWriter<W>>,
) -> Result<Option<RpcRequest>, ProtocolError> {
    let bytes = match line {
        Line::Complete(bytes) => bytes,
        Line::Oversized(size) => {
            let error = ProtocolError::request_too_large(size, MAX_REQUEST_BYTES);
            warn!(target: SERVER_TARGET, %error, "request line skipped");
            respond(writer, &RpcResponse::error(Value::Null, &error))?;
            return Ok(None);
        }
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    match RpcRequest::parse(&bytes) {
        Ok(request) => Ok(Some(request)),
        Err(rejected) => {
            warn!(
                target: SERVER_TARGET,
                code = rejected.error.code(),
                error = %rejected.error,
                "malformed request"
            );
            respond(writer, &RpcResponse::error(rejected.id, &rejected.error))?;
            Ok(None)
        }
    }
}

fn respond<W: Write>(
    writer: &Mutex<ResponseWriter<W>>,
    response: &RpcResponse,
) -> Result<(), ProtocolError> {
    writer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .write_response(response)
}

/// One line of input.
#[derive(Debug, PartialEq, Eq)]
enum Line {
    /// Line content, terminator included when present.
    Complete(Vec<u8>),
    /// Line exceeded [`MAX_REQUEST_BYTES`]; its content was discarded.
    Oversized(usize),
}

/// Reads the next line without buffering more than [`MAX_REQUEST_BYTES`].
///
/// Returns `Ok(None)` at end of input. A final line without a terminator is
/// still returned. Oversized lines are consumed to their end so the next
/// read starts on a fresh request.
fn read_bounded_line<R: BufRead>(reader: &mut R) -> io::Result<Option<Line>> {
    let mut line = Vec::new();
    let mut size = 0_usize;

    loop {
        let (consumed, terminated) = {
            let available = match reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            if available.is_empty() {
                return Ok((size > 0).then(|| classify(line, size)));
            }

            let (chunk, terminated) = match available.iter().position(|byte| *byte == b'\n') {
                Some(newline) => (available.split_at(newline + 1).0, true),
                None => (available, false),
            };
            size = size.saturating_add(chunk.len());
            if size <= MAX_REQUEST_BYTES {
                line.extend_from_slice(chunk);
            } else if !line.is_empty() {
                line = Vec::new();
            }
            (chunk.len(), terminated)
        };

        reader.consume(consumed);
        if terminated {
            return Ok(Some(classify(line, size)));
        }
    }
}

fn classify(line: Vec<u8>, size: usize) -> Line {
    if size > MAX_REQUEST_BYTES {
        Line::Oversized(size)
    } else {
        Line::Complete(line)
    }
}
