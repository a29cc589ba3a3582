//! Logging Infrastructure
//!
//! Structured logging setup; `RUST_LOG` overrides the default level.

/// Initialize the logger
pub fn init() {
    init_with_level("info");
}

/// Initialize the logger with an explicit default level
pub fn init_with_level(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // try_init: tests may initialize more than once
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init()
        .ok();
}
