//! vpc-preflight CLI entry point
//!
//! Confirms an AWS region has a usable default VPC before provisioning.

use clap::Parser;
use deploy_preflight::cli::args::VpcArgs;
use deploy_preflight::cli::output::get_formatter;
use deploy_preflight::logging;
use deploy_preflight::platform::command::SystemRunner;
use deploy_preflight::version::get_build_info;
use deploy_preflight::vpc::aws::AwsCli;
use deploy_preflight::vpc::VpcPreflight;

use std::process::ExitCode;
use tracing::{debug, info};

fn main() -> ExitCode {
    let args = VpcArgs::parse();
    logging::init(args.output.verbose);
    debug!(build = %get_build_info(), "starting");

    let aws = AwsCli::new(Box::new(SystemRunner), &args.aws_bin, &args.region);
    let outcome = VpcPreflight::new(aws).run();
    if let Some(vpc_id) = &outcome.vpc_id {
        info!(region = %args.region, vpc_id = %vpc_id, "preflight complete");
    }

    let formatter = get_formatter(
        args.output.format,
        args.output.color_enabled(),
        args.output.verbose,
        args.output.quiet,
    );
    println!("{}", formatter.format(&outcome.report));

    ExitCode::from(u8::try_from(outcome.exit_code()).unwrap_or(1))
}
