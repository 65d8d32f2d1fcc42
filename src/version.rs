//! Version and build information.
//!
//! Provides version, git commit, and build metadata.

use std::fmt;

/// Text printed by `--version` on both binaries.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCommit: ",
    env!("DEPLOY_PREFLIGHT_GIT_HASH"),
    "\nBuilt: ",
    env!("DEPLOY_PREFLIGHT_BUILD_DATE"),
    "\nTarget: ",
    env!("TARGET"),
);

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub build_date: &'static str,
    pub target: &'static str,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deploy-preflight {} ({}, built {}, {})",
            self.version, self.commit, self.build_date, self.target
        )
    }
}

/// Get build information
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("DEPLOY_PREFLIGHT_GIT_HASH"),
        build_date: env!("DEPLOY_PREFLIGHT_BUILD_DATE"),
        target: env!("TARGET"),
    }
}
