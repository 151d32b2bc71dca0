//! Tracing setup for the binary.
//!
//! Logs go to stderr so report output on stdout stays clean. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "congress_trades=info";

/// Install the global subscriber. A second call is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
