//! Process-based tool execution.
//!
//! [`ProcessExecutor`] implements the [`ToolExecutor`] trait by spawning the
//! tool executable with a discrete argument vector, draining both output
//! streams on reader threads, and enforcing the execution bound. A tool that
//! overruns its bound is killed together with its process group and reaped
//! before the timeout is reported, so no process handles or pipes leak.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::context::{ExecutionContext, STORE_ENV_VAR};
use crate::dispatcher::ToolExecutor;
use crate::error::ToolError;
use crate::invocation::{ToolInvocation, ToolKind};
use crate::outcome::CapturedOutput;

/// Tracing target for tool process operations.
const PROCESS_TARGET: &str = "statute_tools::process";

/// Interval between exit-status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Executes tools by spawning child processes.
///
/// # Example
///
/// ```rust,no_run
/// use statute_tools::{Dispatcher, ExecutionContext, OperationRequest, ProcessExecutor};
///
/// let context = ExecutionContext::new("/app", "/app/tools", "/app/laws");
/// let dispatcher = Dispatcher::new(context, ProcessExecutor);
/// let request = OperationRequest::list_contents("bgb").expect("valid identifier");
/// let result = dispatcher.dispatch(&request);
/// # drop(result);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ToolExecutor for ProcessExecutor {
    fn execute(
        &self,
        context: &ExecutionContext,
        invocation: &ToolInvocation,
    ) -> Result<CapturedOutput, ToolError> {
        run_to_completion(context, invocation)
    }
}

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

type StreamMessage = (StreamKind, io::Result<Vec<u8>>);

fn build_command(
    context: &ExecutionContext,
    invocation: &ToolInvocation,
    path: &Utf8Path,
) -> Command {
    let mut command = Command::new(path.as_std_path());
    command
        .args(invocation.args())
        .current_dir(context.working_dir())
        .env(STORE_ENV_VAR, context.laws_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    isolate_process_group(&mut command);
    command
}

/// Starts the tool in a fresh process group so a timeout also takes down
/// helpers the script spawned.
#[cfg(unix)]
fn isolate_process_group(command: &mut Command) {
    use std::os::unix::process::CommandExt;

    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate_process_group(_command: &mut Command) {}

fn run_to_completion(
    context: &ExecutionContext,
    invocation: &ToolInvocation,
) -> Result<CapturedOutput, ToolError> {
    let tool = invocation.tool();
    let path = context.executable(tool);
    let timeout = context.timeout();

    debug!(
        target: PROCESS_TARGET,
        %tool,
        executable = %path,
        args = ?invocation.args(),
        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        "spawning tool process"
    );

    let start = Instant::now();
    let deadline = start.checked_add(timeout).ok_or_else(|| {
        ToolError::io(
            tool,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("execution bound of {}s is out of range", timeout.as_secs()),
            ),
        )
    })?;
    let mut child = build_command(context, invocation, &path)
        .spawn()
        .map_err(|source| ToolError::SpawnFailed {
            tool,
            path: path.clone().into_std_path_buf(),
            source: source.into(),
        })?;

    let (sender, receiver) = mpsc::channel();
    let mut pending = 0_usize;
    pending += spawn_drain(StreamKind::Stdout, child.stdout.take(), &sender);
    pending += spawn_drain(StreamKind::Stderr, child.stderr.take(), &sender);
    drop(sender);

    let status = match wait_until(&mut child, deadline) {
        Ok(Some(status)) => status,
        Ok(None) => return Err(timed_out(tool, timeout, &mut child)),
        Err(error) => {
            terminate(&mut child);
            return Err(ToolError::io(tool, error));
        }
    };

    let collected = collect_streams(&receiver, pending, deadline)
        .map_err(|error| ToolError::io(tool, error))?;
    let Some((stdout, stderr)) = collected else {
        // The process exited but something it spawned still holds the pipes.
        return Err(timed_out(tool, timeout, &mut child));
    };

    debug!(
        target: PROCESS_TARGET,
        %tool,
        ?status,
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "tool process exited"
    );

    Ok(CapturedOutput::new(
        String::from_utf8_lossy(&stdout),
        String::from_utf8_lossy(&stderr),
        status.code(),
    ))
}

/// Starts a thread that reads `pipe` to the end and reports the bytes.
/// Returns the number of threads started.
fn spawn_drain<R>(kind: StreamKind, source: Option<R>, sender: &Sender<StreamMessage>) -> usize
where
    R: Read + Send + 'static,
{
    let Some(mut pipe) = source else {
        return 0;
    };
    let reporter = sender.clone();
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let result = pipe.read_to_end(&mut buffer).map(|_| buffer);
        // The receiver is gone once the invocation has given up waiting.
        drop(reporter.send((kind, result)));
    });
    1
}

/// Polls the child until it exits or `deadline` passes.
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Waits for every drain thread to report, or returns `None` at `deadline`.
fn collect_streams(
    receiver: &Receiver<StreamMessage>,
    mut pending: usize,
    deadline: Instant,
) -> io::Result<Option<(Vec<u8>, Vec<u8>)>> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    while pending > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok((kind, result)) => {
                let bytes = result?;
                match kind {
                    StreamKind::Stdout => stdout = bytes,
                    StreamKind::Stderr => stderr = bytes,
                }
                pending -= 1;
            }
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(io::Error::other("output reader exited without reporting"));
            }
        }
    }
    Ok(Some((stdout, stderr)))
}

fn timed_out(tool: ToolKind, timeout: Duration, child: &mut Child) -> ToolError {
    warn!(
        target: PROCESS_TARGET,
        %tool,
        timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        "tool timed out, killing process"
    );
    terminate(child);
    ToolError::Timeout { tool, timeout }
}

/// Kills the child and its process group, then reaps it.
fn terminate(child: &mut Child) {
    kill_process_group(child);
    drop(child.kill());
    drop(child.wait());
}

#[cfg(unix)]
fn kill_process_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Ok(pid) = i32::try_from(child.id())
        && let Err(errno) = killpg(Pid::from_raw(pid), Signal::SIGKILL)
    {
        debug!(target: PROCESS_TARGET, pid, %errno, "process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}
