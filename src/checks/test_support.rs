//! Scripted collaborators for check unit tests.

use crate::config::VerifierConfig;
use crate::engine::poll::Sleeper;
use crate::platform::command::{CommandOutput, CommandRunner, CommandSpec};
use crate::platform::http::{HttpClient, HttpResponse};
use crate::{PreflightError, VerifierContext};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn output(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        timed_out: false,
    }
}

/// Answers commands by their rendered command line; unknown commands fail to spawn.
#[derive(Default, Clone)]
pub struct ScriptedRunner {
    responses: Arc<Mutex<HashMap<String, CommandOutput>>>,
    pub calls: Arc<Mutex<Vec<CommandSpec>>>,
}

impl ScriptedRunner {
    pub fn respond(self, command_line: &str, out: CommandOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command_line.to_string(), out);
        self
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, PreflightError> {
        self.calls.lock().unwrap().push(spec.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&spec.display())
            .cloned()
            .ok_or_else(|| PreflightError::CommandError {
                command: spec.display(),
                message: "No such file or directory (os error 2)".to_string(),
            })
    }
}

/// Fixed status per URL; unknown URLs are refused.
#[derive(Default)]
pub struct StaticHttp {
    statuses: HashMap<String, u16>,
}

impl StaticHttp {
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }
}

impl HttpClient for StaticHttp {
    fn get(&self, url: &str) -> Result<HttpResponse, PreflightError> {
        match self.statuses.get(url) {
            Some(&status_code) => Ok(HttpResponse {
                status_code,
                latency_ms: 1,
            }),
            None => Err(PreflightError::HttpError {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            }),
        }
    }
}

pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

pub fn context(config: VerifierConfig) -> VerifierContext {
    context_with(config, ScriptedRunner::default(), StaticHttp::default())
}

pub fn context_with(
    config: VerifierConfig,
    runner: ScriptedRunner,
    http: StaticHttp,
) -> VerifierContext {
    VerifierContext {
        config,
        runner: Box::new(runner),
        http: Box::new(http),
        sleeper: Box::new(NoSleep),
    }
}
