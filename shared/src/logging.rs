//! Shared logging utilities for consistent tracing across the generator

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the filter string scoped to the workspace crates
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("generator={base_level},shared={base_level}")
}

/// Initialize the stdout tracing subscriber with an optional log level
///
/// `RUST_LOG` takes precedence when it is set.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for item-aware info logging
#[macro_export]
macro_rules! item_info {
    ($item:expr, $($arg:tt)*) => {
        tracing::info!(
            item = $item,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for item-aware warning logging
#[macro_export]
macro_rules! item_warn {
    ($item:expr, $($arg:tt)*) => {
        tracing::warn!(
            item = $item,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for item-aware error logging
#[macro_export]
macro_rules! item_error {
    ($item:expr, $($arg:tt)*) => {
        tracing::error!(
            item = $item,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for item-aware debug logging
#[macro_export]
macro_rules! item_debug {
    ($item:expr, $($arg:tt)*) => {
        tracing::debug!(
            item = $item,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(message: &str) {
    info!(timestamp = format_timestamp(), "✅ {}", message);
}

/// Contextual logging helper for progress updates
pub fn log_progress(action: &str, details: &str) {
    info!(timestamp = format_timestamp(), "📋 {}: {}", action, details);
}
