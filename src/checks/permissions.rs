//! Directory permission check.
//!
//! Each configured directory that exists must be listable and accept a
//! marker file. Directories that do not exist are reported but not failed;
//! the application may not use them on this host.

use crate::{CheckResult, Severity, VerifierContext};
use std::fs;
use std::path::Path;

pub const SEVERITY: Severity = Severity::Fatal;

const MARKER_FILE: &str = ".deploy-preflight-write-test";

/// Access problems found for one directory
#[derive(Debug, Clone, PartialEq)]
pub enum DirAccess {
    Ok,
    Missing,
    NotADirectory,
    Unreadable(String),
    Unwritable(String),
}

/// Execute the permissions check
pub fn run(ctx: &VerifierContext) -> CheckResult {
    let dirs = ctx.config.writable_dir_paths();
    let mut checked = 0;
    let mut missing = Vec::new();
    let mut problems = Vec::new();

    for dir in &dirs {
        match dir_access(dir) {
            DirAccess::Ok => checked += 1,
            DirAccess::Missing => missing.push(dir.display().to_string()),
            DirAccess::NotADirectory => problems.push(format!("{}: not a directory", dir.display())),
            DirAccess::Unreadable(e) => problems.push(format!("{}: not readable ({})", dir.display(), e)),
            DirAccess::Unwritable(e) => problems.push(format!("{}: not writable ({})", dir.display(), e)),
        }
    }

    if !problems.is_empty() {
        return CheckResult::unmet(
            SEVERITY,
            format!("{} of {} directories have permission problems", problems.len(), dirs.len()),
            problems.join("; "),
        );
    }

    let mut message = format!("{} directories readable and writable", checked);
    if !missing.is_empty() {
        message.push_str(&format!(" ({} not present: {})", missing.len(), missing.join(", ")));
    }
    CheckResult::pass(message)
}

/// Check read and write access to `dir`.
pub fn dir_access(dir: &Path) -> DirAccess {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => return DirAccess::NotADirectory,
        Ok(_) => {}
        Err(_) => return DirAccess::Missing,
    }

    if let Err(e) = fs::read_dir(dir) {
        return DirAccess::Unreadable(e.to_string());
    }

    let marker = dir.join(format!("{}-{}", MARKER_FILE, std::process::id()));
    match fs::write(&marker, b"ok") {
        Ok(()) => {
            let _ = fs::remove_file(&marker);
            DirAccess::Ok
        }
        Err(e) => DirAccess::Unwritable(e.to_string()),
    }
}
