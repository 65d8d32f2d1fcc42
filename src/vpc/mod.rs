//! Default-VPC preflight.
//!
//! Confirms that a region has the default network a managed database
//! deployment expects, before any provisioning runs:
//!
//! 1. `aws-cli`          - the AWS CLI runs (fatal)
//! 2. `identity`         - credentials resolve to an account (fatal)
//! 3. `default-vpc`      - the region has a default VPC (fatal)
//! 4. `subnets`          - at least two subnets, for a multi-AZ DB subnet group (warning)
//! 5. `internet-gateway` - an internet gateway is attached (warning)
//!
//! A fatal failure stops the sequence, since every later query needs its
//! answer. Warnings never change the exit code. Nothing is created or
//! modified; when the default VPC is missing the remediation command is
//! reported, not run.

pub mod aws;

use crate::engine::orchestrator::execute_check;
use crate::engine::result::{ResultAggregator, ValidationReport};
use crate::platform::linux;
use crate::{Check, CheckResult, Severity};
use aws::{AwsCli, Subnet};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::info;

/// Region checked when none is given.
pub const DEFAULT_REGION: &str = "eu-west-3";

/// Subnets needed for a multi-AZ database subnet group.
pub const MIN_SUBNETS: usize = 2;

/// Result of a preflight run
#[derive(Debug, Clone)]
pub struct VpcOutcome {
    pub report: ValidationReport,
    pub vpc_id: Option<String>,
}

impl VpcOutcome {
    /// 1 if any fatal step failed. Warnings never count.
    pub fn exit_code(&self) -> i32 {
        self.report.exit_code()
    }
}

pub struct VpcPreflight {
    aws: AwsCli,
}

impl VpcPreflight {
    pub fn new(aws: AwsCli) -> Self {
        VpcPreflight { aws }
    }

    /// Run the preflight sequence.
    pub fn run(&self) -> VpcOutcome {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::new(
            &format!("Default VPC preflight ({})", self.aws.region()),
            false,
        );
        let vpc_id = self.run_steps(&mut aggregator);

        let hostname = linux::get_hostname().unwrap_or_else(|_| "unknown".to_string());
        aggregator.set_metadata(hostname, start.elapsed().as_millis() as u64);
        VpcOutcome {
            report: aggregator.to_report(),
            vpc_id,
        }
    }

    fn run_steps(&self, agg: &mut ResultAggregator) -> Option<String> {
        let cli = step(
            agg,
            "aws-cli",
            "AWS CLI",
            Severity::Fatal,
            "Verify the AWS CLI is installed",
            || match self.aws.version() {
                Ok(version) => CheckResult::pass(format!("AWS CLI available ({})", version)),
                Err(e) => CheckResult::fail(
                    "AWS CLI not found",
                    format!("{}; install it from https://aws.amazon.com/cli/", e),
                ),
            },
        );
        if cli.is_fail() {
            return None;
        }

        let identity = step(
            agg,
            "identity",
            "AWS Credentials",
            Severity::Fatal,
            "Resolve the caller identity",
            || match self.aws.caller_identity() {
                Ok(id) => CheckResult::pass(format!("Account {} as {}", id.account, id.arn)),
                Err(e) => CheckResult::fail(
                    "AWS credentials not configured",
                    format!("{}; run `aws configure`", e),
                ),
            },
        );
        if identity.is_fail() {
            return None;
        }

        let found = RefCell::new(None);
        let vpc = step(
            agg,
            "default-vpc",
            "Default VPC",
            Severity::Fatal,
            "Look up the region's default VPC",
            || match self.aws.default_vpc_id() {
                Ok(Some(id)) => {
                    let message = format!("Default VPC {} in {}", id, self.aws.region());
                    *found.borrow_mut() = Some(id);
                    CheckResult::pass(message)
                }
                Ok(None) => CheckResult::fail(
                    format!("No default VPC in {}", self.aws.region()),
                    format!("Create one with: {}", self.aws.remediation_command()),
                ),
                Err(e) => CheckResult::fail("Could not query VPCs", e.to_string()),
            },
        );
        let vpc_id = match (vpc.is_fail(), found.into_inner()) {
            (false, Some(id)) => id,
            _ => return None,
        };
        info!(vpc_id = %vpc_id, "default VPC found");

        step(
            agg,
            "subnets",
            "Subnets",
            Severity::Warning,
            "Count subnets in the default VPC",
            || match self.aws.subnets(&vpc_id) {
                Ok(subnets) => grade_subnets(&subnets),
                Err(e) => CheckResult::warn("Could not list subnets", e.to_string()),
            },
        );

        step(
            agg,
            "internet-gateway",
            "Internet Gateway",
            Severity::Warning,
            "Check for an attached internet gateway",
            || match self.aws.internet_gateway(&vpc_id) {
                Ok(Some(igw)) => CheckResult::pass(format!("Internet gateway {} attached", igw)),
                Ok(None) => CheckResult::warn(
                    format!("No internet gateway attached to {}", vpc_id),
                    "Instances in this VPC will not reach the internet",
                ),
                Err(e) => CheckResult::warn("Could not query internet gateways", e.to_string()),
            },
        );

        Some(vpc_id)
    }
}

/// Pass with a listing, or warn when there are fewer than [`MIN_SUBNETS`].
pub fn grade_subnets(subnets: &[Subnet]) -> CheckResult {
    let zones: BTreeSet<&str> = subnets.iter().map(|s| s.availability_zone.as_str()).collect();
    let listing = subnets
        .iter()
        .map(|s| format!("{} ({}, {})", s.subnet_id, s.availability_zone, s.cidr_block))
        .collect::<Vec<_>>()
        .join(", ");

    if subnets.len() < MIN_SUBNETS {
        CheckResult::warn(
            format!("Only {} subnet(s) in the default VPC", subnets.len()),
            format!(
                "A database subnet group needs subnets in at least {} availability zones{}",
                MIN_SUBNETS,
                if listing.is_empty() { String::new() } else { format!(": {}", listing) }
            ),
        )
    } else {
        CheckResult::pass(format!(
            "{} subnets across {} availability zones: {}",
            subnets.len(),
            zones.len(),
            listing
        ))
    }
}

fn step<F>(
    agg: &mut ResultAggregator,
    id: &str,
    name: &str,
    severity: Severity,
    description: &str,
    check_fn: F,
) -> CheckResult
where
    F: Fn() -> CheckResult,
{
    let result = execute_check(check_fn);
    agg.add_result(Check {
        id: id.to_string(),
        name: name.to_string(),
        severity,
        description: description.to_string(),
        result: Some(result.clone()),
    });
    result
}
