//! Static files check.

use crate::{CheckResult, Severity, VerifierContext};
use std::fs;

pub const SEVERITY: Severity = Severity::Warning;

/// Execute the static files check
pub fn run(ctx: &VerifierContext) -> CheckResult {
    let dir = ctx.config.static_dir_path();

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries.filter_map(Result::ok).count(),
        Err(e) => {
            return CheckResult::unmet(
                SEVERITY,
                format!("Static directory {} not found", dir.display()),
                format!("{}; run `manage.py collectstatic`", e),
            )
        }
    };

    if entries == 0 {
        CheckResult::unmet(
            SEVERITY,
            format!("Static directory {} is empty", dir.display()),
            "Run `manage.py collectstatic`",
        )
    } else {
        CheckResult::pass(format!("{} entries in {}", entries, dir.display()))
    }
}
