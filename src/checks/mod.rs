//! Deployment verification checks.
//!
//! Seven independent checks, always executed in this order:
//! environment, permissions, database, static_files, services,
//! application, logs.
//!
//! # Graceful Degradation
//!
//! Checks never panic and never return errors. Every error condition
//! (missing binary, unreadable file, refused connection) is converted into
//! a CheckResult graded by the check's [`Severity`].

pub mod application;
pub mod database;
pub mod environment;
pub mod logs;
pub mod permissions;
pub mod services;
pub mod static_files;

#[cfg(test)]
pub(crate) mod test_support;

use crate::engine::orchestrator::RegisteredCheck;
use crate::{CheckResult, Severity, VerifierContext};
use std::fmt;
use std::sync::Arc;

/// The verifier checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    Environment,
    Permissions,
    Database,
    StaticFiles,
    Services,
    Application,
    Logs,
}

impl CheckId {
    /// Execution order of a full run
    pub const ALL: [CheckId; 7] = [
        CheckId::Environment,
        CheckId::Permissions,
        CheckId::Database,
        CheckId::StaticFiles,
        CheckId::Services,
        CheckId::Application,
        CheckId::Logs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckId::Environment => "environment",
            CheckId::Permissions => "permissions",
            CheckId::Database => "database",
            CheckId::StaticFiles => "static_files",
            CheckId::Services => "services",
            CheckId::Application => "application",
            CheckId::Logs => "logs",
        }
    }

    pub fn parse(s: &str) -> Option<CheckId> {
        CheckId::ALL.into_iter().find(|id| id.as_str() == s)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CheckId::Environment => "Environment Variables",
            CheckId::Permissions => "Directory Permissions",
            CheckId::Database => "Database Connectivity",
            CheckId::StaticFiles => "Static Files",
            CheckId::Services => "System Services",
            CheckId::Application => "Application Health",
            CheckId::Logs => "Error Logs",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CheckId::Environment => "Verify required variables are set in the env file",
            CheckId::Permissions => "Verify application directories are readable and writable",
            CheckId::Database => "Run the management command's database check",
            CheckId::StaticFiles => "Verify collected static files are present",
            CheckId::Services => "Verify application services and reverse proxy are active",
            CheckId::Application => "Wait for the health endpoint, then check key endpoints",
            CheckId::Logs => "Scan recent log lines for error keywords",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CheckId::Environment => environment::SEVERITY,
            CheckId::Permissions => permissions::SEVERITY,
            CheckId::Database => database::SEVERITY,
            CheckId::StaticFiles => static_files::SEVERITY,
            CheckId::Services => services::SEVERITY,
            CheckId::Application => application::SEVERITY,
            CheckId::Logs => logs::SEVERITY,
        }
    }

    /// Run this check against `ctx`.
    pub fn run(&self, ctx: &VerifierContext) -> CheckResult {
        match self {
            CheckId::Environment => environment::run(ctx),
            CheckId::Permissions => permissions::run(ctx),
            CheckId::Database => database::run(ctx),
            CheckId::StaticFiles => static_files::run(ctx),
            CheckId::Services => services::run(ctx),
            CheckId::Application => application::run(ctx),
            CheckId::Logs => logs::run(ctx),
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the registered verifier checks sharing one context.
pub fn create_verifier_checks(ctx: Arc<VerifierContext>) -> Vec<RegisteredCheck> {
    CheckId::ALL
        .into_iter()
        .map(|id| {
            let ctx = Arc::clone(&ctx);
            RegisteredCheck {
                id: id.as_str().to_string(),
                name: id.name().to_string(),
                severity: id.severity(),
                description: id.description().to_string(),
                check_fn: Box::new(move || id.run(&ctx)),
            }
        })
        .collect()
}
