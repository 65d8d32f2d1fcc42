//! Command line arguments for both tools.

use crate::checks::CheckId;
use crate::version::LONG_VERSION;
use crate::vpc::DEFAULT_REGION;
use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

/// Options shared by both tools
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only output failures and warnings
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Include details and timings for every check
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored output (also honors NO_COLOR)
    #[arg(long)]
    pub no_color: bool,
}

impl OutputArgs {
    pub fn color_enabled(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}

/// Runs a single check instead of the full checklist
#[derive(Debug, Clone, Default, Args)]
#[group(multiple = false)]
pub struct CheckSelection {
    /// Check required variables in the env file
    #[arg(long)]
    pub environment: bool,
    /// Check directory read/write permissions
    #[arg(long)]
    pub permissions: bool,
    /// Check database connectivity
    #[arg(long)]
    pub database: bool,
    /// Check collected static files
    #[arg(long)]
    pub static_files: bool,
    /// Check system services
    #[arg(long)]
    pub services: bool,
    /// Check application health endpoints
    #[arg(long)]
    pub application: bool,
    /// Scan logs for errors
    #[arg(long)]
    pub logs: bool,
}

impl CheckSelection {
    /// The selected check, if any.
    pub fn selected(&self) -> Option<CheckId> {
        [
            (self.environment, CheckId::Environment),
            (self.permissions, CheckId::Permissions),
            (self.database, CheckId::Database),
            (self.static_files, CheckId::StaticFiles),
            (self.services, CheckId::Services),
            (self.application, CheckId::Application),
            (self.logs, CheckId::Logs),
        ]
        .into_iter()
        .find_map(|(set, id)| set.then_some(id))
    }
}

/// Post-deployment health verification.
///
/// Without a check flag, runs every check in order and exits 0 only if none
/// failed. With a check flag, runs that check alone and exits with its code.
#[derive(Debug, Clone, Parser)]
#[command(name = "verify-deployment", version, long_version = LONG_VERSION)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub selection: CheckSelection,

    /// Count warnings as failures
    #[arg(long)]
    pub strict: bool,

    /// TOML configuration file
    #[arg(long, env = "DEPLOY_PREFLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Application directory (overrides the config file)
    #[arg(long)]
    pub app_dir: Option<PathBuf>,

    /// Health check URL (overrides the config file)
    #[arg(long)]
    pub health_url: Option<String>,

    /// List available checks and exit
    #[arg(long)]
    pub list: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Default-VPC preflight for AWS.
///
/// Exits 1 if the AWS CLI, credentials or the default VPC are missing.
/// Subnet and internet gateway findings are warnings only.
#[derive(Debug, Clone, Parser)]
#[command(name = "vpc-preflight", version, long_version = LONG_VERSION)]
pub struct VpcArgs {
    /// AWS region to inspect
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Path to the aws binary
    #[arg(long, default_value = "aws")]
    pub aws_bin: String,

    #[command(flatten)]
    pub output: OutputArgs,
}
