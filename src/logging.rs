// Logging setup on tracing / tracing-subscriber
//
// RUST_LOG selects the filter (default: info), e.g.
// RUST_LOG=grain_blend=debug to see model sizes per solve.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber for the server
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Initialize logging for tests; safe to call more than once
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
