//! System services check.
//!
//! Asks systemd whether each application service and the reverse proxy is
//! active. `systemctl is-active` prints the unit state and exits 0 only for
//! `active`.

use crate::platform::command::CommandSpec;
use crate::{CheckResult, Severity, VerifierContext};

pub const SEVERITY: Severity = Severity::Warning;

/// State of one unit as reported by systemctl
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceState {
    pub name: String,
    pub state: String,
}

impl ServiceState {
    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

/// Query one unit.
pub fn service_state(ctx: &VerifierContext, name: &str) -> ServiceState {
    let spec = CommandSpec::new("systemctl", ["is-active", name]).timeout(ctx.config.command_timeout());
    let state = match ctx.runner.run(&spec) {
        Ok(output) if output.timed_out => "timeout".to_string(),
        Ok(output) => {
            let state = output.stdout.trim();
            if state.is_empty() {
                "unknown".to_string()
            } else {
                state.to_string()
            }
        }
        Err(_) => "unavailable".to_string(),
    };
    ServiceState {
        name: name.to_string(),
        state,
    }
}

/// Execute the services check
pub fn run(ctx: &VerifierContext) -> CheckResult {
    let services = ctx.config.all_services();
    if services.is_empty() {
        return CheckResult::skip("No services configured");
    }

    let states: Vec<ServiceState> = services.iter().map(|s| service_state(ctx, s)).collect();
    let inactive: Vec<String> = states
        .iter()
        .filter(|s| !s.is_active())
        .map(|s| format!("{} ({})", s.name, s.state))
        .collect();

    if inactive.is_empty() {
        CheckResult::pass(format!("All {} services active: {}", states.len(), services.join(", ")))
    } else {
        CheckResult::unmet(
            SEVERITY,
            format!("{} of {} services not active", inactive.len(), states.len()),
            inactive.join(", "),
        )
    }
}
