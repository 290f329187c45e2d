#![deny(missing_docs)]
//! Shared logging utilities for the markdown-dl workspace.
//!
//! Library crates log through the `engine_*` macros so every record carries
//! the same target, which lets the binary filter crawler output from the
//! noise of browser and HTTP dependencies.

/// Log target used by every `engine_*` macro.
pub const LOG_TARGET: &str = "markdown_dl";

#[doc(hidden)]
pub use log;

/// Logs a trace-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        $crate::log::info!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        $crate::log::error!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized, so
/// every test may call it.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Keep dependency chatter out of test output.
    let config = ConfigBuilder::new()
        .add_filter_allow_str(LOG_TARGET)
        .build();

    let _ = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Never);
}
