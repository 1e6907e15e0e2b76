//! External command execution utilities.
//!
//! Provides a Builder-based API for running external tools, with an explicit
//! [`ToolOutput`] that keeps exit status and stderr around so callers can
//! gate destructive follow-up work on success.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Inspect the outcome yourself
//! let out = Cmd::from_slice(&["rembg", "i", "a.png", "b.png"]).output()?;
//! if !out.success() {
//!     eprintln!("{}", out.stderr);
//! }
//!
//! // Or fail on non-zero exit
//! Cmd::from_slice(&["magick", "in.xcf", "-flatten", "out.png"]).output()?.check()?;
//! ```

use crate::log;
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    process::{Command, ExitStatus},
    sync::OnceLock,
};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Failure of an external tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to execute `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {}{}", fmt_code(.code), fmt_stderr(.stderr))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "signal".to_string(),
    }
}

fn fmt_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

// ============================================================================
// Output
// ============================================================================

/// Captured result of a finished process.
#[derive(Debug)]
pub struct ToolOutput {
    pub program: String,
    pub status: ExitStatus,
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, `None` when killed by a signal.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Turn a non-zero exit into a [`ToolError::Failed`].
    pub fn check(self) -> Result<Self, ToolError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                code: self.code(),
                program: self.program,
                stderr: strip_ansi(&self.stderr).into_owned(),
            })
        }
    }
}

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
}

impl Cmd {
    /// Create from a command array (e.g., `["rembg", "i"]`).
    ///
    /// Empty arguments are dropped, so an unset placeholder never turns into
    /// a stray `""` argument.
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args = iter
            .map(|s| s.as_ref())
            .filter(|arg| !arg.is_empty())
            .map(OsStr::to_owned)
            .collect();
        Self { program, args }
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Wait for the process and capture its outcome.
    ///
    /// Only a failure to start the process is an error here; a non-zero exit
    /// is reported through [`ToolOutput::success`].
    pub fn output(self) -> Result<ToolOutput, ToolError> {
        let name = self.program_name();

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| ToolError::Spawn {
                program: name.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if output.status.success() {
            log_stderr(&name, &stderr);
        }

        Ok(ToolOutput {
            program: name,
            status: output.status,
            stderr,
        })
    }
}

// ============================================================================
// Tool Chatter
// ============================================================================

/// Forward stderr of a successful run to the log.
///
/// Escape codes and `\r` progress redraws are stripped, blank lines dropped.
fn log_stderr(name: &str, stderr: &str) {
    let lines: Vec<_> = stderr
        .lines()
        .map(strip_ansi)
        .filter(|line| !line.trim().is_empty())
        .collect();

    if !lines.is_empty() {
        log!(name; "{}", lines.join("\n"));
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Strip ANSI escape codes and carriage-return progress redraws.
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]|\r").unwrap());
    re.replace_all(s, "")
}

// ============================================================================
// Tests
// ============================================================================
