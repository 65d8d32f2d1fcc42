//! deploy-preflight library
//!
//! Pre-provisioning and post-deployment verification for a web application
//! hosted on AWS.
//!
//! Two tools are built on this library:
//! - `vpc-preflight`: checks that the target region has a usable default VPC
//!   (identity, default VPC, subnets, internet gateway) via the AWS CLI
//! - `verify-deployment`: runs the post-deployment checklist (environment,
//!   permissions, database, static files, services, application, logs)
//!
//! # Example
//!
//! ```no_run
//! use deploy_preflight::config::VerifierConfig;
//! use deploy_preflight::{run_verification, VerifierContext};
//!
//! let ctx = VerifierContext::system(VerifierConfig::default());
//! let report = run_verification(ctx, None, false);
//! println!("Checks passed: {}", report.summary().passed);
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod logging;
pub mod platform;
pub mod version;
pub mod vpc;

use checks::CheckId;
use config::VerifierConfig;
use engine::orchestrator::{CheckOrchestrator, OrchestratorConfig};
use engine::poll::{Sleeper, ThreadSleeper};
use platform::command::{CommandRunner, SystemRunner};
use platform::http::{HttpClient, UreqClient};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

// Re-exports for public API
pub use engine::orchestrator::CheckOrchestrator as Orchestrator;
pub use engine::result::{ResultSummary, ValidationReport as Report};

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckResult {
    /// Check passed
    Pass { message: String, duration_ms: u64 },
    /// A warning-severity condition was not met
    Warn {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// A fatal condition was not met. `exit_code` is what a single-check
    /// invocation exits with.
    Fail {
        message: String,
        details: String,
        exit_code: i32,
        duration_ms: u64,
    },
    /// Check could not be evaluated
    Skip { reason: String },
}

impl CheckResult {
    pub fn pass(message: impl Into<String>) -> Self {
        CheckResult::Pass {
            message: message.into(),
            duration_ms: 0,
        }
    }

    pub fn warn(message: impl Into<String>, details: impl Into<String>) -> Self {
        CheckResult::Warn {
            message: message.into(),
            details: details.into(),
            duration_ms: 0,
        }
    }

    pub fn fail(message: impl Into<String>, details: impl Into<String>) -> Self {
        CheckResult::Fail {
            message: message.into(),
            details: details.into(),
            exit_code: 1,
            duration_ms: 0,
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        CheckResult::Skip {
            reason: reason.into(),
        }
    }

    /// Result for a condition that was not met, graded by the check's severity.
    pub fn unmet(severity: Severity, message: impl Into<String>, details: impl Into<String>) -> Self {
        match severity {
            Severity::Fatal => CheckResult::fail(message, details),
            Severity::Warning => CheckResult::warn(message, details),
        }
    }

    /// Override the exit code of a failure. Zero is coerced to 1 so a
    /// failure never exits successfully.
    pub fn with_exit_code(self, code: i32) -> Self {
        match self {
            CheckResult::Fail {
                message,
                details,
                duration_ms,
                ..
            } => CheckResult::Fail {
                message,
                details,
                exit_code: if code == 0 { 1 } else { code },
                duration_ms,
            },
            other => other,
        }
    }

    /// Stamp the measured duration onto the result.
    pub fn with_duration(self, elapsed_ms: u64) -> Self {
        match self {
            CheckResult::Pass { message, .. } => CheckResult::Pass {
                message,
                duration_ms: elapsed_ms,
            },
            CheckResult::Warn { message, details, .. } => CheckResult::Warn {
                message,
                details,
                duration_ms: elapsed_ms,
            },
            CheckResult::Fail {
                message,
                details,
                exit_code,
                ..
            } => CheckResult::Fail {
                message,
                details,
                exit_code,
                duration_ms: elapsed_ms,
            },
            skip @ CheckResult::Skip { .. } => skip,
        }
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckResult::Fail { .. })
    }

    pub fn is_warn(&self) -> bool {
        matches!(self, CheckResult::Warn { .. })
    }

    /// Process exit code for a single-check invocation.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self {
            CheckResult::Pass { .. } | CheckResult::Skip { .. } => 0,
            CheckResult::Warn { .. } => i32::from(strict),
            CheckResult::Fail { exit_code, .. } => *exit_code,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            CheckResult::Pass { duration_ms, .. }
            | CheckResult::Warn { duration_ms, .. }
            | CheckResult::Fail { duration_ms, .. } => *duration_ms,
            CheckResult::Skip { .. } => 0,
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Warn { message, details, .. } => {
                write!(f, "WARN: {} ({})", message, details)
            }
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// How an unmet check condition affects the overall result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Must pass for the run to succeed
    Fatal,
    /// Reported, but only blocks success in strict mode
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "fatal"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A check with its result.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    /// Stable identifier (e.g., "database")
    pub id: String,
    /// Human-readable name
    pub name: String,
    pub severity: Severity,
    /// Description of what this check validates
    pub description: String,
    /// Result of the check (None if not yet executed)
    pub result: Option<CheckResult>,
}

/// Error types for deploy-preflight operations.
#[derive(Debug, Clone, Error)]
pub enum PreflightError {
    /// External command could not be run
    #[error("Command '{command}' error: {message}")]
    CommandError { command: String, message: String },

    /// Operation timed out
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout { operation: String, timeout_ms: u64 },

    /// I/O error
    #[error("I/O error in {context}: {message}")]
    IoError { context: String, message: String },

    /// Parse error
    #[error("Parse error in {context}: {message}")]
    ParseError { context: String, message: String },

    /// HTTP transport error (no response received)
    #[error("HTTP request to {url} failed: {message}")]
    HttpError { url: String, message: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// External collaborators and settings shared by the verifier checks.
pub struct VerifierContext {
    pub config: VerifierConfig,
    pub runner: Box<dyn CommandRunner>,
    pub http: Box<dyn HttpClient>,
    pub sleeper: Box<dyn Sleeper>,
}

impl VerifierContext {
    /// Context backed by real processes, HTTP and sleeping.
    pub fn system(config: VerifierConfig) -> Self {
        let http = UreqClient::new(Duration::from_secs(config.http_timeout_secs));
        VerifierContext {
            config,
            runner: Box::new(SystemRunner),
            http: Box::new(http),
            sleeper: Box::new(ThreadSleeper),
        }
    }
}

/// Run the deployment verification checklist.
///
/// With `only` set, exactly that check runs; otherwise all seven run in
/// order, each exactly once, regardless of earlier failures.
///
/// # Example
///
/// ```no_run
/// use deploy_preflight::checks::CheckId;
/// use deploy_preflight::config::VerifierConfig;
/// use deploy_preflight::{run_verification, VerifierContext};
///
/// let ctx = VerifierContext::system(VerifierConfig::default());
/// let report = run_verification(ctx, Some(CheckId::Database), false);
/// std::process::exit(report.exit_code());
/// ```
pub fn run_verification(ctx: VerifierContext, only: Option<CheckId>, strict: bool) -> Report {
    let orch_config = OrchestratorConfig {
        title: "Deployment verification".to_string(),
        strict,
    };

    let mut orchestrator = CheckOrchestrator::new(orch_config);
    orchestrator.register_checks(checks::create_verifier_checks(Arc::new(ctx)));

    match only {
        Some(id) => {
            let mut report = orchestrator.run_specific(&[id.as_str().to_string()]);
            report.single_check = true;
            report
        }
        None => orchestrator.run_all(),
    }
}
