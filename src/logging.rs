//! Diagnostic tracing on stderr.
//!
//! Report output goes to stdout through the formatters; tracing events are
//! for operators chasing a slow or odd check and never mix with it.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level is `warn`, or `info` with
/// `verbose`.
///
/// ```bash
/// RUST_LOG=deploy_preflight=debug verify-deployment --application
/// ```
pub fn init(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
