//! Per-stage results.

use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::core::Stage;
use crate::log;
use crate::utils::plural::plural_count;

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Left untouched on purpose (e.g. listed in `exclude.skip_background`).
    Skipped,
}

/// A file the stage could not process.
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Result of running one stage over its batch.
#[derive(Debug)]
pub struct StageReport {
    pub stage: Stage,
    pub processed: usize,
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
    /// Stopped early by Ctrl+C.
    pub interrupted: bool,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            processed: 0,
            skipped: 0,
            failures: Vec::new(),
            interrupted: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    /// One-line summary, e.g. `12 files, 2 skipped, 1 failed`.
    pub fn summary(&self) -> String {
        let mut parts = vec![plural_count(self.processed, "file")];
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        if !self.failures.is_empty() {
            parts.push(format!("{} failed", self.failures.len()));
        }
        if self.interrupted {
            parts.push("interrupted".to_string());
        }
        parts.join(", ")
    }

    /// Log the summary line followed by every failure.
    pub fn print(&self, config: &PipelineConfig) {
        log!(self.stage.name(); "{}", self.summary());
        for failure in &self.failures {
            log!(
                "failed";
                "{}: {}",
                config.root_relative(&failure.path).display(),
                failure.message
            );
        }
    }
}
