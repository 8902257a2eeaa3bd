//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a filter string (same syntax as `RUST_LOG`)
///
/// Returns `false` if a global logger was already installed.
pub fn init_with_filter(filter: &str) -> bool {
    env_logger::Builder::from_default_env()
        .parse_filters(filter)
        .try_init()
        .is_ok()
}
