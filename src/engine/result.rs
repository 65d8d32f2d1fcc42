//! Result aggregation and reporting.
//!
//! Collects check results, derives summaries and the failed/warned check
//! lists that decide the process exit code.

use crate::{Check, CheckResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

/// Validation report containing all check results
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub hostname: String,
    /// Warnings count as failures
    pub strict: bool,
    /// The run selected one check; its own exit code is the report's
    pub single_check: bool,
    pub checks: Vec<Check>,
    pub total_duration_ms: u64,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new(title: &str) -> Self {
        ValidationReport {
            title: title.to_string(),
            timestamp: Utc::now(),
            hostname: String::new(),
            strict: false,
            single_check: false,
            checks: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();

        for check in &self.checks {
            summary.total += 1;

            match &check.result {
                Some(CheckResult::Pass { duration_ms, .. }) => {
                    summary.passed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Warn { duration_ms, .. }) => {
                    summary.warned += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Fail { duration_ms, .. }) => {
                    summary.failed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Skip { .. }) | None => {
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    /// Ids of checks that block success. In strict mode warnings are included.
    pub fn failed_checks(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| match &c.result {
                Some(CheckResult::Fail { .. }) => true,
                Some(CheckResult::Warn { .. }) => self.strict,
                _ => false,
            })
            .map(|c| c.id.as_str())
            .collect()
    }

    /// Ids of checks that only warned (empty in strict mode, where they fail).
    pub fn warned_checks(&self) -> Vec<&str> {
        if self.strict {
            return Vec::new();
        }
        self.checks
            .iter()
            .filter(|c| matches!(&c.result, Some(CheckResult::Warn { .. })))
            .map(|c| c.id.as_str())
            .collect()
    }

    /// Process exit code.
    ///
    /// For a single-check run this is that check's own code (for example the
    /// database command's). Otherwise 0 iff the failed-checks list is empty.
    pub fn exit_code(&self) -> i32 {
        if self.single_check {
            return self
                .checks
                .first()
                .and_then(|c| c.result.as_ref())
                .map_or(0, |r| r.exit_code(self.strict));
        }
        if self.failed_checks().is_empty() {
            0
        } else {
            1
        }
    }

    pub fn find(&self, id: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.id == id)
    }
}

/// Result aggregator for collecting check results
pub struct ResultAggregator {
    title: String,
    strict: bool,
    checks: Vec<Check>,
    hostname: String,
    total_duration_ms: u64,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new(title: &str, strict: bool) -> Self {
        ResultAggregator {
            title: title.to_string(),
            strict,
            checks: Vec::new(),
            hostname: String::new(),
            total_duration_ms: 0,
        }
    }

    /// Set report metadata
    pub fn set_metadata(&mut self, hostname: String, total_duration_ms: u64) {
        self.hostname = hostname;
        self.total_duration_ms = total_duration_ms;
    }

    /// Add a completed check result
    pub fn add_result(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// Create final validation report
    pub fn to_report(&self) -> ValidationReport {
        ValidationReport {
            title: self.title.clone(),
            timestamp: Utc::now(),
            hostname: self.hostname.clone(),
            strict: self.strict,
            single_check: false,
            checks: self.checks.clone(),
            total_duration_ms: self.total_duration_ms,
        }
    }
}
