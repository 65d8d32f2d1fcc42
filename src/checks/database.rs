//! Database connectivity check.
//!
//! Runs `python manage.py check --database default` from the application
//! directory. The command's exit code is carried on failure so that a
//! single-check invocation exits with exactly that code.

use crate::platform::command::{CommandSpec, EXIT_NOT_FOUND};
use crate::{CheckResult, Severity, VerifierContext};
use tracing::debug;

pub const SEVERITY: Severity = Severity::Fatal;

/// The management command used for the connectivity test.
pub fn command(ctx: &VerifierContext) -> CommandSpec {
    CommandSpec::new(
        ctx.config.python.clone(),
        ["manage.py", "check", "--database", "default"],
    )
    .cwd(ctx.config.app_dir.clone())
    .timeout(ctx.config.command_timeout())
}

/// Execute the database check
pub fn run(ctx: &VerifierContext) -> CheckResult {
    let spec = command(ctx);

    match ctx.runner.run(&spec) {
        Ok(output) if output.success() => CheckResult::pass("Database connection OK"),
        Ok(output) => {
            debug!(code = output.code(), "database check command failed");
            CheckResult::unmet(SEVERITY, "Database connection failed", output.error_summary())
                .with_exit_code(output.code())
        }
        Err(e) => CheckResult::unmet(SEVERITY, "Could not run database check", e.to_string())
            .with_exit_code(EXIT_NOT_FOUND),
    }
}
