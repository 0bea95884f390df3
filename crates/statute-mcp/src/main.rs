//! Entry point for the `statute-mcp` binary.

use std::io::{self, Write};
use std::process::ExitCode;

use statute_mcp::{BootstrapError, SystemConfigLoader, bootstrap_with};
use statute_tools::ProcessExecutor;

fn main() -> ExitCode {
    let server = match bootstrap_with(&SystemConfigLoader, ProcessExecutor) {
        Ok(server) => server,
        Err(error) => return report_bootstrap_failure(&error),
    };

    match server.serve(io::stdin().lock(), io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(target: "statute_mcp::main", %error, "server stopped");
            ExitCode::FAILURE
        }
    }
}

fn report_bootstrap_failure(error: &BootstrapError) -> ExitCode {
    let informational = error.is_informational();
    match error {
        BootstrapError::Configuration { source } => drop(source.print()),
        BootstrapError::Telemetry { .. } => {
            drop(writeln!(io::stderr().lock(), "statute-mcp: {error}"));
        }
    }
    if informational {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
