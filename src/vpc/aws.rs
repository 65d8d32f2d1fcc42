//! Read-only AWS CLI queries used by the VPC preflight.
//!
//! Identity and subnet listings are requested as JSON and parsed with
//! serde. Single-id lookups use `--query ... --output text`, where the CLI
//! prints `None` when the query matches nothing.

use crate::platform::command::{CommandOutput, CommandRunner, CommandSpec};
use crate::PreflightError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Caller identity from `aws sts get-caller-identity`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallerIdentity {
    pub user_id: String,
    pub account: String,
    pub arn: String,
}

/// A subnet from `aws ec2 describe-subnets`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    pub subnet_id: String,
    pub availability_zone: String,
    pub cidr_block: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnets {
    #[serde(default)]
    subnets: Vec<Subnet>,
}

/// Thin wrapper around the `aws` binary for one region.
pub struct AwsCli {
    runner: Box<dyn CommandRunner>,
    bin: String,
    region: String,
    timeout: Duration,
}

impl AwsCli {
    pub fn new(runner: Box<dyn CommandRunner>, bin: &str, region: &str) -> Self {
        AwsCli {
            runner,
            bin: bin.to_string(),
            region: region.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// `aws --version`
    pub fn version(&self) -> Result<String, PreflightError> {
        let output = self.run(vec!["--version".to_string()], false)?;
        // aws v1 prints its version on stderr
        let text = if output.stdout.trim().is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        Ok(text.split_whitespace().next().unwrap_or("aws-cli").to_string())
    }

    pub fn caller_identity(&self) -> Result<CallerIdentity, PreflightError> {
        let out = self.call(args(["sts", "get-caller-identity", "--output", "json"]), false)?;
        serde_json::from_str(&out).map_err(|e| PreflightError::ParseError {
            context: "sts get-caller-identity".to_string(),
            message: e.to_string(),
        })
    }

    /// Id of the region's default VPC, None if there is none.
    pub fn default_vpc_id(&self) -> Result<Option<String>, PreflightError> {
        let out = self.call(
            args([
                "ec2",
                "describe-vpcs",
                "--filters",
                "Name=isDefault,Values=true",
                "--query",
                "Vpcs[0].VpcId",
                "--output",
                "text",
            ]),
            true,
        )?;
        Ok(parse_text_id(&out))
    }

    pub fn subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>, PreflightError> {
        let filter = format!("Name=vpc-id,Values={}", vpc_id);
        let out = self.call(
            args(["ec2", "describe-subnets", "--filters", filter.as_str(), "--output", "json"]),
            true,
        )?;
        let parsed: DescribeSubnets =
            serde_json::from_str(&out).map_err(|e| PreflightError::ParseError {
                context: "ec2 describe-subnets".to_string(),
                message: e.to_string(),
            })?;
        Ok(parsed.subnets)
    }

    /// Id of the internet gateway attached to `vpc_id`, if any.
    pub fn internet_gateway(&self, vpc_id: &str) -> Result<Option<String>, PreflightError> {
        let filter = format!("Name=attachment.vpc-id,Values={}", vpc_id);
        let out = self.call(
            args([
                "ec2",
                "describe-internet-gateways",
                "--filters",
                filter.as_str(),
                "--query",
                "InternetGateways[0].InternetGatewayId",
                "--output",
                "text",
            ]),
            true,
        )?;
        Ok(parse_text_id(&out))
    }

    /// Command that creates the default VPC in this region.
    pub fn remediation_command(&self) -> String {
        format!("aws ec2 create-default-vpc --region {}", self.region)
    }

    /// Run the CLI, returning stdout on success. Stderr never stands in for
    /// an answer; the CLI writes warnings there.
    fn call(&self, args: Vec<String>, regional: bool) -> Result<String, PreflightError> {
        Ok(self.run(args, regional)?.stdout)
    }

    fn run(&self, mut args: Vec<String>, regional: bool) -> Result<CommandOutput, PreflightError> {
        if regional {
            args.push("--region".to_string());
            args.push(self.region.clone());
        }
        let spec = CommandSpec::new(self.bin.clone(), args).timeout(self.timeout);
        let output = self.runner.run(&spec)?;
        debug!(command = %spec.display(), code = output.code(), "aws cli call");

        if output.timed_out {
            return Err(PreflightError::Timeout {
                operation: spec.display(),
                timeout_ms: self.timeout.as_millis() as u64,
            });
        }
        if !output.success() {
            return Err(PreflightError::CommandError {
                command: spec.display(),
                message: output.error_summary(),
            });
        }
        Ok(output)
    }
}

fn args<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    items.into_iter().map(str::to_string).collect()
}

/// Interpret `--output text` for a single id: empty or `None` means absent.
pub fn parse_text_id(output: &str) -> Option<String> {
    let id = output.trim();
    if id.is_empty() || id == "None" {
        None
    } else {
        Some(id.to_string())
    }
}
