//! verify-deployment CLI entry point
//!
//! Post-deployment health verification for a web application host.

use clap::Parser;
use deploy_preflight::checks::CheckId;
use deploy_preflight::cli::args::VerifyArgs;
use deploy_preflight::cli::output::get_formatter;
use deploy_preflight::config::VerifierConfig;
use deploy_preflight::version::get_build_info;
use deploy_preflight::{logging, run_verification, VerifierContext};

use std::process::ExitCode;
use tracing::debug;

/// Configuration or runtime error before any check ran
const EXIT_CONFIG_ERROR: u8 = 3;

fn main() -> ExitCode {
    let args = VerifyArgs::parse();
    logging::init(args.output.verbose);
    debug!(build = %get_build_info(), "starting");

    if args.list {
        print_check_list();
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };
    debug!(app_dir = %config.app_dir.display(), "configuration loaded");

    let only = args.selection.selected();
    let report = run_verification(VerifierContext::system(config), only, args.strict);

    let formatter = get_formatter(
        args.output.format,
        args.output.color_enabled(),
        args.output.verbose,
        args.output.quiet,
    );
    println!("{}", formatter.format(&report));

    ExitCode::from(u8::try_from(report.exit_code()).unwrap_or(1))
}

fn load_config(args: &VerifyArgs) -> Result<VerifierConfig, deploy_preflight::PreflightError> {
    let mut config = VerifierConfig::load(args.config.as_deref())?;
    if let Some(app_dir) = &args.app_dir {
        config.app_dir = app_dir.clone();
    }
    if let Some(url) = &args.health_url {
        config.health_url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

fn print_check_list() {
    println!("Available checks:\n");
    for id in CheckId::ALL {
        println!("  {:<14} {:<22} [{}]", id.as_str(), id.name(), id.severity());
        println!("  {:<14} {}", "", id.description());
    }
}
