//! Tracing setup for embedding shells.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Respects `RUST_LOG`; defaults to
/// `info` with debug output for the vibeloop crates. Safe to call more
/// than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vibeloop_core=debug,vibeloop_app=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
