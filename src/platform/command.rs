//! External command execution.
//!
//! Every external tool (aws, systemctl, python) goes through the
//! [`CommandRunner`] trait so checks can be exercised against scripted
//! runners in tests.
//!
//! # Graceful Degradation
//!
//! - Binary not found / spawn failure: returns PreflightError::CommandError
//! - Command exceeds its timeout: the child is killed and the output is
//!   returned with `timed_out = true`
//! - Non-UTF8 output: converted lossily

use crate::PreflightError;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Exit code reported when the program could not be started at all,
/// matching the shell's "command not found".
pub const EXIT_NOT_FOUND: i32 = 127;

/// A command to run.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shell-like rendering, used in messages and logs.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Exit code to propagate; signals and timeouts map to 1.
    pub fn code(&self) -> i32 {
        match self.exit_code {
            Some(code) if !self.timed_out => code,
            _ => 1,
        }
    }

    /// First non-empty line of stderr, falling back to stdout.
    pub fn error_summary(&self) -> String {
        if self.timed_out {
            return "command timed out".to_string();
        }
        self.stderr
            .lines()
            .chain(self.stdout.lines())
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("no output")
            .to_string()
    }
}

/// Runs external commands.
pub trait CommandRunner: Send + Sync {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, PreflightError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, PreflightError> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref dir) = spec.cwd {
            cmd.current_dir(dir);
        }

        debug!(command = %spec.display(), "spawning child process");
        let mut child = cmd.spawn().map_err(|e| PreflightError::CommandError {
            command: spec.display(),
            message: e.to_string(),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        // Drain both pipes while waiting; a full pipe would block the child.
        let stdout_handle = thread::spawn(move || read_stream(stdout));
        let stderr_handle = thread::spawn(move || read_stream(stderr));

        let wait_error = |e: std::io::Error| PreflightError::CommandError {
            command: spec.display(),
            message: format!("wait failed: {}", e),
        };

        let mut timed_out = false;
        let status = match child.wait_timeout(spec.timeout).map_err(wait_error)? {
            Some(status) => status,
            None => {
                warn!(
                    command = %spec.display(),
                    timeout_secs = spec.timeout.as_secs(),
                    "command timed out, killing"
                );
                timed_out = true;
                // The child may exit between the timeout and the kill.
                let _ = child.kill();
                child.wait().map_err(wait_error)?
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        debug!(exit_code = ?status.code(), timed_out, "command finished");
        Ok(CommandOutput {
            exit_code: status.code(),
            stdout,
            stderr,
            timed_out,
        })
    }
}

fn read_stream<R: Read>(stream: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut s) = stream {
        let _ = s.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
