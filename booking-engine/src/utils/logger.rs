//! Logging Infrastructure
//!
//! Structured logging setup for embedders and tests. The engine itself
//! only emits `tracing` events; installing a subscriber is up to the
//! application, and this is the default one.

use tracing_subscriber::EnvFilter;

/// Initialize the default logger at `info` level, overridable through
/// `RUST_LOG`.
pub fn init_logger() {
    init_logger_with_level("info");
}

/// Initialize the logger with an explicit default level. Safe to call
/// more than once; later calls are no-ops.
pub fn init_logger_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init();
}
