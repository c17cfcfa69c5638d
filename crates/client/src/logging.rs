//! Logging for the client.
//!
//! Provides `log_*!` macros used throughout the crate. They all dispatch to
//! `tracing` under the `logdeck_client` target, so a single `EnvFilter`
//! controls the pipeline's verbosity.

use tracing_subscriber::EnvFilter;

/// Log an info message
pub fn log_info_impl(msg: &str) {
    tracing::info!(target: "logdeck_client", "{}", msg);
}

/// Log an error message
pub fn log_error_impl(msg: &str) {
    tracing::error!(target: "logdeck_client", "{}", msg);
}

/// Log a warning message
pub fn log_warn_impl(msg: &str) {
    tracing::warn!(target: "logdeck_client", "{}", msg);
}

/// Log a debug message
pub fn log_debug_impl(msg: &str) {
    tracing::debug!(target: "logdeck_client", "{}", msg);
}

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used. Calling this
/// more than once is harmless, later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Log an info message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log_info_impl(&format!($($arg)*))
    };
}

/// Log an error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log_error_impl(&format!($($arg)*))
    };
}

/// Log a warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::log_warn_impl(&format!($($arg)*))
    };
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log_debug_impl(&format!($($arg)*))
    };
}
