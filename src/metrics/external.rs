//! Runner for external scorer processes
//!
//! Comparative scorers follow a common pattern:
//! 1. Run the scorer as a subprocess with `std::process::Command`
//! 2. Optionally feed a staged file on stdin
//! 3. Parse the text output into a result record
//!
//! Waits are bounded by a timeout so a hung scorer cannot hang the run.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result from running an external tool
#[derive(Debug, Clone)]
pub struct ExternalToolResult {
    /// Whether the tool ran to completion (exit code may still be non-zero)
    pub success: bool,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Process exit code
    pub return_code: Option<i32>,
    /// Whether the tool timed out
    pub timed_out: bool,
    /// Error message if failed
    pub error: Option<String>,
}

impl ExternalToolResult {
    /// Create a successful result
    pub fn success(stdout: String, stderr: String, return_code: i32) -> Self {
        Self {
            success: true,
            stdout,
            stderr,
            return_code: Some(return_code),
            timed_out: false,
            error: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            timed_out: false,
            error: Some(error),
        }
    }

    /// Create a timeout result
    pub fn timeout(tool_name: &str, timeout_secs: u64) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            timed_out: true,
            error: Some(format!("{} timed out after {}s", tool_name, timeout_secs)),
        }
    }

    /// Completed with exit code 0
    pub fn exited_cleanly(&self) -> bool {
        self.success && self.return_code == Some(0)
    }
}

/// Run an external tool
///
/// # Arguments
/// * `cmd` - Command and arguments to run
/// * `tool_name` - Human-readable tool name for error messages
/// * `timeout_secs` - Timeout in seconds (0 = no timeout)
/// * `stdin` - File whose contents are fed to the tool's standard input
pub fn run_external_tool(
    cmd: &[String],
    tool_name: &str,
    timeout_secs: u64,
    stdin: Option<&Path>,
) -> ExternalToolResult {
    if cmd.is_empty() {
        return ExternalToolResult::failure("Empty command".to_string());
    }

    let program = &cmd[0];
    let args = &cmd[1..];

    debug!("Running {}: {} {:?}", tool_name, program, args);

    let mut command = Command::new(program);
    command.args(args);

    match stdin {
        Some(path) => match std::fs::File::open(path) {
            Ok(file) => {
                command.stdin(Stdio::from(file));
            }
            Err(e) => {
                return ExternalToolResult::failure(format!(
                    "Failed to open {} for {}: {}",
                    path.display(),
                    tool_name,
                    e
                ));
            }
        },
        None => {
            command.stdin(Stdio::null());
        }
    }

    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                return ExternalToolResult::failure(format!(
                    "{} not found. Please install it first.",
                    tool_name
                ));
            }
            return ExternalToolResult::failure(format!("Failed to run {}: {}", tool_name, e));
        }
    };

    if timeout_secs > 0 {
        run_with_timeout(child, tool_name, timeout_secs)
    } else {
        run_without_timeout(child, tool_name)
    }
}

/// Run process without timeout
fn run_without_timeout(child: Child, tool_name: &str) -> ExternalToolResult {
    let output = match child.wait_with_output() {
        Ok(output) => output,
        Err(e) => {
            return ExternalToolResult::failure(format!("Failed to wait for {}: {}", tool_name, e));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let return_code = output.status.code().unwrap_or(-1);

    ExternalToolResult::success(stdout, stderr, return_code)
}

/// How long to wait for output pipes to close once the tool is gone
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Run process with timeout
///
/// Output pipes are drained on background threads so a chatty tool cannot
/// block on a full pipe while we poll for exit. A grandchild that inherited
/// the pipes can keep them open after the tool itself exits or is killed, so
/// the drain threads are only waited on until a deadline and then detached.
fn run_with_timeout(mut child: Child, tool_name: &str, timeout_secs: u64) -> ExternalToolResult {
    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let start = Instant::now();
    let timeout = Duration::from_secs(timeout_secs);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("{} timed out after {}s", tool_name, timeout_secs);
                    let deadline = Instant::now() + DRAIN_GRACE;
                    collect(stdout_reader, deadline, tool_name);
                    collect(stderr_reader, deadline, tool_name);
                    return ExternalToolResult::timeout(tool_name, timeout_secs);
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return ExternalToolResult::failure(format!(
                    "Failed to wait for {}: {}",
                    tool_name, e
                ));
            }
        }
    };

    let deadline = (start + timeout).max(Instant::now() + DRAIN_GRACE);
    let stdout = collect(stdout_reader, deadline, tool_name);
    let stderr = collect(stderr_reader, deadline, tool_name);

    ExternalToolResult::success(stdout, stderr, status.code().unwrap_or(-1))
}

/// Join a drain thread if it finishes before `deadline`, else detach it.
fn collect(reader: Option<JoinHandle<String>>, deadline: Instant, tool_name: &str) -> String {
    let Some(handle) = reader else {
        return String::new();
    };
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            debug!("{} output still open after exit; detaching reader", tool_name);
            return String::new();
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    handle.join().unwrap_or_default()
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).to_string()
    })
}
