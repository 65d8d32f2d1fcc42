//! Environment file check.
//!
//! Reads the application's `.env` file and confirms every required
//! variable is present with a non-empty value. Values are never printed.

use crate::{CheckResult, Severity, VerifierContext};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const SEVERITY: Severity = Severity::Fatal;

/// Execute the environment check
pub fn run(ctx: &VerifierContext) -> CheckResult {
    let path = ctx.config.env_file_path();

    let vars = match read_env_file(&path) {
        Ok(vars) => vars,
        Err(e) => {
            return CheckResult::unmet(
                SEVERITY,
                format!("Cannot read env file {}", path.display()),
                e,
            )
        }
    };

    let missing = missing_vars(&vars, &ctx.config.required_vars);
    debug!(file = %path.display(), loaded = vars.len(), missing = missing.len(), "env file parsed");

    if missing.is_empty() {
        CheckResult::pass(format!(
            "All {} required variables set in {}",
            ctx.config.required_vars.len(),
            path.display()
        ))
    } else {
        CheckResult::unmet(
            SEVERITY,
            format!("Missing required variables: {}", missing.join(", ")),
            format!("Set them in {}", path.display()),
        )
    }
}

/// Parse a `.env` file into a map.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, String> {
    let iter = dotenv::from_path_iter(path).map_err(|e| e.to_string())?;
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| e.to_string())?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Required names that are absent or blank, in the order given.
pub fn missing_vars(vars: &HashMap<String, String>, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|name| vars.get(*name).map_or(true, |v| v.trim().is_empty()))
        .cloned()
        .collect()
}
