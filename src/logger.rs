//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output that only appears with `--verbose`
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "indexed {} documents", count);
//! log!("warning"; "bad frontmatter in {}", path.display());
//! debug!("image"; "skipping {}: {}", src, err);
//! ```

use owo_colors::OwoColorize;
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
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

/// Write one `[module] message` line to stderr.
///
/// stdout is left to `folio query`'s JSON.
pub fn log(module: &str, message: &str) {
    let mut out = stderr().lock();
    writeln!(out, "{} {message}", colorize_prefix(module)).ok();
    out.flush().ok();
}

/// `[module]`, colored by module; matching ignores case.
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    let style = |name: &str| module.eq_ignore_ascii_case(name);
    if style("build") {
        prefix.bright_blue().bold().to_string()
    } else if style("query") {
        prefix.bright_green().bold().to_string()
    } else if style("error") {
        prefix.bright_red().bold().to_string()
    } else if style("warning") {
        prefix.bright_magenta().bold().to_string()
    } else {
        prefix.bright_yellow().bold().to_string()
    }
}
