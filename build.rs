//! Build script for deploy-preflight.
//!
//! Embeds the git commit, build date and target triple for `--version`.
//! Each value falls back to "unknown" so `env!` always resolves.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    println!(
        "cargo:rustc-env=TARGET={}",
        env::var("TARGET").unwrap_or_else(|_| "unknown".to_string())
    );

    let hash = command_output("git", &["rev-parse", "--short", "HEAD"]);
    println!(
        "cargo:rustc-env=DEPLOY_PREFLIGHT_GIT_HASH={}",
        hash.unwrap_or_else(|| "unknown".to_string())
    );

    let date = command_output("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]);
    println!(
        "cargo:rustc-env=DEPLOY_PREFLIGHT_BUILD_DATE={}",
        date.unwrap_or_else(|| "unknown".to_string())
    );
}

/// Trimmed stdout of a successful command
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            } else {
                None
            }
        })
}
