//! Check execution orchestrator.
//!
//! Manages check registration and sequential execution.
//!
//! # Graceful Degradation
//!
//! - Check panics: caught via std::panic::catch_unwind, converted to Fail
//! - Check failure: never stops the run; every selected check executes
//! - Invalid check ID: silently skipped in run_specific
//! - Empty check list: returns empty report (not an error)

use crate::engine::result::{ResultAggregator, ValidationReport};
use crate::platform::linux;
use crate::{Check, CheckResult, Severity};
use std::time::Instant;
use tracing::{info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Report title
    pub title: String,
    /// Count warnings as failures
    pub strict: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            title: "Preflight".to_string(),
            strict: false,
        }
    }
}

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub check_fn: Box<dyn Fn() -> CheckResult>,
}

/// Check orchestrator
pub struct CheckOrchestrator {
    config: OrchestratorConfig,
    checks: Vec<RegisteredCheck>,
}

impl CheckOrchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig) -> Self {
        CheckOrchestrator {
            config,
            checks: Vec::new(),
        }
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) {
        self.checks.extend(checks);
    }

    /// Register a single check
    pub fn register_check(&mut self, check: RegisteredCheck) {
        self.checks.push(check);
    }

    /// Run all registered checks
    pub fn run_all(&self) -> ValidationReport {
        let ids: Vec<String> = self.checks.iter().map(|c| c.id.clone()).collect();
        self.run_specific(&ids)
    }

    /// Run specific checks by ID, in registration order
    pub fn run_specific(&self, check_ids: &[String]) -> ValidationReport {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::new(&self.config.title, self.config.strict);

        for check in self.checks.iter().filter(|c| check_ids.contains(&c.id)) {
            info!(check = %check.id, "running check");
            let result = execute_check(&check.check_fn);
            if result.is_fail() {
                warn!(check = %check.id, "check failed");
            }
            aggregator.add_result(Check {
                id: check.id.clone(),
                name: check.name.clone(),
                severity: check.severity,
                description: check.description.clone(),
                result: Some(result),
            });
        }

        let hostname = linux::get_hostname().unwrap_or_else(|_| "unknown".to_string());
        aggregator.set_metadata(hostname, start.elapsed().as_millis() as u64);
        aggregator.to_report()
    }
}

/// Execute a check function, timing it and converting panics into failures.
pub fn execute_check<F>(check_fn: F) -> CheckResult
where
    F: Fn() -> CheckResult,
{
    let start = Instant::now();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(check_fn));
    let elapsed = start.elapsed().as_millis() as u64;

    match result {
        Ok(check_result) => check_result.with_duration(elapsed),
        Err(_) => CheckResult::fail(
            "Check panicked during execution",
            "An unexpected error occurred",
        )
        .with_duration(elapsed),
    }
}
