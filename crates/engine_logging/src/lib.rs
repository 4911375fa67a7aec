#![deny(missing_docs)]
//! Shared logging utilities for the analyst workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Each line carries the
//! session label bound to the emitting thread. Only the host's event thread
//! binds one; lines from engine worker threads carry [`NO_SESSION`] and name
//! their call by ticket instead.

use std::cell::RefCell;

/// Placeholder tag for threads that have no panel session bound.
pub const NO_SESSION: &str = "-";

thread_local! {
    /// Thread-local storage for the session identifier of the open panel.
    static SESSION_LABEL: RefCell<String> = RefCell::new(NO_SESSION.to_string());
}

/// Binds a session identifier to the current thread.
/// The host calls this when a panel opens on its event thread.
pub fn set_session_label(label: impl Into<String>) {
    let label = label.into();
    SESSION_LABEL.with(|v| *v.borrow_mut() = label);
}

/// Clears the session identifier bound to the current thread.
pub fn clear_session_label() {
    SESSION_LABEL.with(|v| *v.borrow_mut() = NO_SESSION.to_string());
}

/// Retrieves the session identifier bound to the current thread.
/// Returns [`NO_SESSION`] if none has been set.
pub fn session_label() -> String {
    SESSION_LABEL.with(|v| v.borrow().clone())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("[{}] {}", $crate::session_label(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("[{}] {}", $crate::session_label(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("[{}] {}", $crate::session_label(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("[{}] {}", $crate::session_label(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("[{}] {}", $crate::session_label(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
