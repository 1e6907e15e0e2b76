//! Logging utilities with colored output and progress display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for lines only shown with `--verbose`
//! - `Progress` for a single-line `done/total` counter per stage
//!
//! # Example
//!
//! ```ignore
//! log!("flatten"; "converting {} files", count);
//!
//! let progress = Progress::new("encode", 40);
//! progress.inc();
//! progress.finish();
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{IsTerminal, Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
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

/// Whether a progress line currently occupies the last terminal row.
static BAR_ACTIVE: AtomicBool = AtomicBool::new(false);

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
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

/// Print `[module] message`, moving an active progress line out of the way.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut out = stdout().lock();
    if BAR_ACTIVE.load(Ordering::SeqCst) {
        clear_line(&mut out);
    }
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Prefix colour by role: stages get their own colour, problems are red.
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module {
        "reconcile" => prefix.bright_blue().bold().to_string(),
        "flatten" | "encode" => prefix.bright_green().bold().to_string(),
        "nobg" => prefix.bright_magenta().bold().to_string(),
        "error" | "failed" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

fn clear_line(out: &mut impl Write) {
    execute!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// Progress
// ============================================================================

/// `[encode] 12/40`, redrawn in place after every file.
///
/// Only drawn when stdout is a terminal and the batch is not empty. `log!`
/// lines printed meanwhile land above it.
pub struct Progress {
    label: &'static str,
    total: usize,
    done: AtomicUsize,
    enabled: bool,
}

impl Progress {
    pub fn new(label: &'static str, total: usize) -> Self {
        let enabled = total > 0 && stdout().is_terminal();
        BAR_ACTIVE.store(enabled, Ordering::SeqCst);

        let progress = Self {
            label,
            total,
            done: AtomicUsize::new(0),
            enabled,
        };
        progress.draw(false);
        progress
    }

    pub fn inc(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
        self.draw(false);
    }

    pub fn current(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    fn draw(&self, keep: bool) {
        if !self.enabled {
            return;
        }
        let mut out = stdout().lock();
        clear_line(&mut out);
        let line = format!("{} {}/{}", colorize_prefix(self.label), self.current(), self.total);
        if keep {
            writeln!(out, "{line}").ok();
        } else {
            write!(out, "{line}").ok();
        }
        out.flush().ok();
    }

    /// Leave the final count on screen.
    pub fn finish(mut self) {
        BAR_ACTIVE.store(false, Ordering::SeqCst);
        self.draw(true);
        // nothing left for Drop to clear
        self.enabled = false;
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if self.enabled {
            BAR_ACTIVE.store(false, Ordering::SeqCst);
            let mut out = stdout().lock();
            clear_line(&mut out);
            out.flush().ok();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
