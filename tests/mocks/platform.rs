//! Mock platform implementations for testing.
//!
//! Provides scripted implementations of:
//! - External commands (aws, systemctl, python)
//! - HTTP endpoints, including ones that come up after a delay
//! - Sleeping, as a virtual clock

use deploy_preflight::config::VerifierConfig;
use deploy_preflight::engine::poll::Sleeper;
use deploy_preflight::platform::command::{CommandOutput, CommandRunner, CommandSpec};
use deploy_preflight::platform::http::{HttpClient, HttpResponse};
use deploy_preflight::{PreflightError, VerifierContext};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Virtual time advanced by `sleep`
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ms: Arc<AtomicU64>,
}

impl VirtualClock {
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms.load(Ordering::SeqCst))
    }
}

impl Sleeper for VirtualClock {
    fn sleep(&self, duration: Duration) {
        self.now_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }
}

pub fn output(code: i32, stdout: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(code),
        stdout: stdout.to_string(),
        stderr: String::new(),
        timed_out: false,
    }
}

pub fn failure(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
        timed_out: false,
    }
}

/// Answers commands whose command line contains a pattern. The first
/// matching rule wins; unmatched commands fail to spawn.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    rules: Arc<Mutex<Vec<(String, CommandOutput)>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, pattern: &str, out: CommandOutput) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((pattern.to_string(), out));
        self
    }

    /// Every command line run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(pattern)).count()
    }

    /// aws responses for a region with a default VPC
    pub fn healthy_aws() -> Self {
        MockRunner::new()
            .on("--version", output(0, "aws-cli/2.15.0 Python/3.11.6 Linux/6.1 exe/x86_64\n"))
            .on(
                "get-caller-identity",
                output(
                    0,
                    r#"{"UserId": "AIDAEXAMPLE", "Account": "123456789012", "Arn": "arn:aws:iam::123456789012:user/deployer"}"#,
                ),
            )
            .on("describe-vpcs", output(0, "vpc-0abc123\n"))
            .on(
                "describe-subnets",
                output(
                    0,
                    r#"{"Subnets": [
                        {"SubnetId": "subnet-a", "AvailabilityZone": "eu-west-3a", "CidrBlock": "172.31.0.0/20"},
                        {"SubnetId": "subnet-b", "AvailabilityZone": "eu-west-3b", "CidrBlock": "172.31.16.0/20"},
                        {"SubnetId": "subnet-c", "AvailabilityZone": "eu-west-3c", "CidrBlock": "172.31.32.0/20"}
                    ]}"#,
                ),
            )
            .on("describe-internet-gateways", output(0, "igw-0def456\n"))
    }

    /// Host responses for a deployment where everything is up
    pub fn healthy_host() -> Self {
        MockRunner::new()
            .on(
                "manage.py check --database default",
                output(0, "System check identified no issues (0 silenced).\n"),
            )
            .on("systemctl is-active", output(0, "active\n"))
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, PreflightError> {
        let line = spec.display();
        self.calls.lock().unwrap().push(line.clone());
        self.rules
            .lock()
            .unwrap()
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, out)| out.clone())
            .ok_or_else(|| PreflightError::CommandError {
                command: line,
                message: "No such file or directory (os error 2)".to_string(),
            })
    }
}

/// How a mock endpoint answers
#[derive(Debug, Clone)]
pub enum Endpoint {
    Status(u16),
    /// Connection refused until the clock reaches `at`, then 200
    UpAt(Duration),
    Refused,
}

/// HTTP endpoints evaluated against a virtual clock
#[derive(Debug, Clone, Default)]
pub struct MockHttp {
    clock: VirtualClock,
    endpoints: HashMap<String, Endpoint>,
    requests: Arc<AtomicU64>,
}

impl MockHttp {
    pub fn new(clock: VirtualClock) -> Self {
        MockHttp {
            clock,
            ..Default::default()
        }
    }

    pub fn endpoint(mut self, url: &str, endpoint: Endpoint) -> Self {
        self.endpoints.insert(url.to_string(), endpoint);
        self
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }
}

impl HttpClient for MockHttp {
    fn get(&self, url: &str) -> Result<HttpResponse, PreflightError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let refused = || PreflightError::HttpError {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        };
        match self.endpoints.get(url).cloned().unwrap_or(Endpoint::Refused) {
            Endpoint::Status(status_code) => Ok(HttpResponse {
                status_code,
                latency_ms: 3,
            }),
            Endpoint::UpAt(at) if self.clock.now() >= at => Ok(HttpResponse {
                status_code: 200,
                latency_ms: 3,
            }),
            Endpoint::UpAt(_) | Endpoint::Refused => Err(refused()),
        }
    }
}

pub const HEALTH_URL: &str = "http://localhost/health/";
pub const HOME_URL: &str = "http://localhost/";
pub const ADMIN_URL: &str = "http://localhost/admin/login/";

/// Endpoints of a running application
pub fn healthy_http(clock: VirtualClock) -> MockHttp {
    MockHttp::new(clock)
        .endpoint(HEALTH_URL, Endpoint::Status(200))
        .endpoint(HOME_URL, Endpoint::Status(200))
        .endpoint(ADMIN_URL, Endpoint::Status(200))
}

/// A deployed application tree on disk
pub struct AppTree {
    pub dir: tempfile::TempDir,
}

impl AppTree {
    /// Env file, writable directories, collected static files and a clean log.
    pub fn healthy() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(
            root.join(".env"),
            "SECRET_KEY=s3cret\nDATABASE_URL=postgres://app@db/app\nENVIRONMENT=production\n",
        )
        .unwrap();
        for sub in ["media", "staticfiles", "logs"] {
            std::fs::create_dir(root.join(sub)).unwrap();
        }
        std::fs::write(root.join("staticfiles").join("app.css"), "body {}").unwrap();
        std::fs::write(
            root.join("logs").join("app.log"),
            "INFO Booting worker\nINFO Listening at: unix:/run/gunicorn.sock\n",
        )
        .unwrap();
        AppTree { dir }
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        std::fs::write(self.path().join(relative), content).unwrap();
    }

    /// Config rooted at this tree, scanning only its own log.
    pub fn config(&self) -> VerifierConfig {
        VerifierConfig {
            app_dir: self.path().to_path_buf(),
            log_files: Some(vec![self.path().join("logs").join("app.log")]),
            ..Default::default()
        }
    }
}

pub fn context(config: VerifierConfig, runner: MockRunner, http: MockHttp, clock: VirtualClock) -> VerifierContext {
    VerifierContext {
        config,
        runner: Box::new(runner),
        http: Box::new(http),
        sleeper: Box::new(clock),
    }
}
