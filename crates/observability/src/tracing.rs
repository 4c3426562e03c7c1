//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging with the default `info` level.
///
/// Safe to call multiple times (subsequent calls are no-ops), which lets
/// every test that exercises an IO crate call it unconditionally.
pub fn init() {
    init_with("info")
}

/// Initialize with an explicit fallback filter, still overridable through
/// `RUST_LOG`.
pub fn init_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
