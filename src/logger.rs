//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for records that only show up with `--verbose`
//!
//! Records go to stderr so rendered documents can be piped from stdout.
//!
//! # Example
//!
//! ```ignore
//! log!("render"; "wrote {} bytes", xml.len());
//! debug!("feed"; "added item {}", link);
//! ```

use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stderr = stderr().lock();
    writeln!(stderr, "{prefix} {message}").ok();
    stderr.flush().ok();
}

/// Apply color to a module prefix based on module type
///
/// Honors the global color override set from `--color`.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "render" => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_blue().bold().to_string())
            .to_string(),
        "valid" | "ok" => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_green().bold().to_string())
            .to_string(),
        "error" | "invalid" => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_red().bold().to_string())
            .to_string(),
        _ => prefix
            .if_supports_color(Stream::Stderr, |p| p.bright_yellow().bold().to_string())
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_prefix_keeps_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("render", "render"), "[render]");
        assert_eq!(colorize_prefix("Feed", "feed"), "[Feed]");
    }
}
