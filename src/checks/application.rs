//! Application reachability check.
//!
//! Polls the health URL at a fixed interval until it answers or the poll
//! ceiling is reached; a timeout fails the check. Once healthy, each extra
//! endpoint is requested once and any problem is downgraded to a warning.

use crate::engine::poll::{poll_until, PollOutcome};
use crate::platform::http::HttpResponse;
use crate::{CheckResult, Severity, VerifierContext};
use tracing::info;

pub const SEVERITY: Severity = Severity::Fatal;

/// Execute the application check
pub fn run(ctx: &VerifierContext) -> CheckResult {
    let config = &ctx.config;
    let policy = config.poll_policy();
    info!(
        url = %config.health_url,
        interval_secs = policy.interval.as_secs(),
        ceiling_secs = policy.ceiling.as_secs(),
        "waiting for health endpoint"
    );

    let outcome = poll_until(&policy, ctx.sleeper.as_ref(), || {
        fetch(ctx, &config.health_url).and_then(|response| {
            if response.is_success() {
                Ok(response)
            } else {
                Err(format!("HTTP {}", response.status_code))
            }
        })
    });

    let (health, attempts, waited) = match outcome {
        PollOutcome::Ready {
            value,
            attempts,
            waited,
        } => (value, attempts, waited),
        PollOutcome::TimedOut {
            attempts,
            waited,
            last_error,
        } => {
            return CheckResult::unmet(
                SEVERITY,
                format!(
                    "Health check {} not healthy after {}s",
                    config.health_url,
                    waited.as_secs()
                ),
                format!(
                    "{} attempts, last error: {}",
                    attempts,
                    last_error.unwrap_or_else(|| "none".to_string())
                ),
            )
        }
    };

    let endpoint_problems: Vec<String> = config
        .endpoints
        .iter()
        .filter_map(|url| match fetch(ctx, url) {
            Ok(response) if response.is_success() => None,
            Ok(response) => Some(format!("{} returned HTTP {}", url, response.status_code)),
            Err(e) => Some(format!("{}: {}", url, e)),
        })
        .collect();

    let healthy = format!(
        "Health check OK after {}s ({} attempt{}, {}ms)",
        waited.as_secs(),
        attempts,
        if attempts == 1 { "" } else { "s" },
        health.latency_ms
    );

    if endpoint_problems.is_empty() {
        CheckResult::pass(healthy)
    } else {
        CheckResult::warn(
            format!(
                "{}; {} of {} endpoints unhealthy",
                healthy,
                endpoint_problems.len(),
                config.endpoints.len()
            ),
            endpoint_problems.join("; "),
        )
    }
}

fn fetch(ctx: &VerifierContext, url: &str) -> Result<HttpResponse, String> {
    ctx.http.get(url).map_err(|e| e.to_string())
}
