//! The four pipeline stages.
//!
//! ```text
//! raw_images/weapons/Sword.xcf
//!     │ flatten     (layered -> raster, source untouched)
//!     ▼
//! images/weapons/Sword.png
//!     │ nobg        (background stripped in place)
//!     ▼
//! images/weapons/Sword.png
//!     │ encode      (raster -> webp, raster removed)
//!     ▼
//! images/weapons/Sword.webp
//! ```
//!
//! `reconcile` runs before all of them and only shapes directories.
//!
//! Batch stages are fail-soft: a file that fails is recorded in the
//! [`StageReport`] and the batch moves on. Setup problems (missing roots,
//! missing tools) abort the stage before any file is touched.

mod background;
mod encode;
mod flatten;
mod reconcile;
mod report;

pub use report::{FileFailure, Outcome, StageReport};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};

use crate::config::PipelineConfig;
use crate::core::Stage;
use crate::logger::Progress;
use crate::scan::{PathSet, walk_files};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Knobs that change how a batch reacts to trouble.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Abort the stage on the first failing file.
    pub fail_fast: bool,
    /// Polled before each file; `true` stops the batch.
    pub interrupted: fn() -> bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fail_fast: false,
            interrupted: crate::core::is_shutdown,
        }
    }
}

/// Run a single stage over the configured trees.
pub fn run_stage(config: &PipelineConfig, stage: Stage, opts: &RunOptions) -> Result<StageReport> {
    preflight(config, stage)?;

    match stage {
        Stage::Reconcile => {
            let summary = reconcile::reconcile(config)?;
            let mut report = StageReport::new(stage);
            report.processed = summary.removed.len() + summary.created.len();
            Ok(report)
        }
        Stage::Flatten => {
            let files = collect_files(
                &config.paths.source,
                &config.flatten.extensions,
                &config.exclude.ignore,
            )?;
            process_files(config, stage, files, opts, |path| {
                flatten::flatten_file(config, path)
            })
        }
        Stage::RemoveBackground => {
            let files = collect_files(
                &config.paths.output,
                &config.flatten.raster_extensions(),
                &config.exclude.ignore,
            )?;
            // leftovers from an interrupted run would otherwise be processed as images
            let files = background::prune_stale_temps(config, files)?;
            process_files(config, stage, files, opts, |path| {
                background::remove_background(config, path)
            })
        }
        Stage::Encode => {
            let files = collect_files(
                &config.paths.output,
                &config.flatten.raster_extensions(),
                &config.exclude.ignore,
            )?;
            process_files(config, stage, files, opts, |path| {
                encode::encode_file(config, path)
            })
        }
    }
}

/// Run `stages` in order, printing each report.
///
/// Stops after the first interrupted stage. Setup errors abort immediately.
pub fn run_stages<I>(config: &PipelineConfig, stages: I, opts: &RunOptions) -> Result<Vec<StageReport>>
where
    I: IntoIterator<Item = Stage>,
{
    let mut reports = Vec::new();

    for stage in stages {
        let report = run_stage(config, stage, opts)?;
        report.print(config);

        let interrupted = report.interrupted;
        reports.push(report);
        if interrupted {
            break;
        }
    }

    Ok(reports)
}

/// Turn the reports of a whole run into its exit status.
pub fn finish(reports: &[StageReport]) -> Result<()> {
    if reports.iter().all(StageReport::is_success) {
        log!("done"; "all stages completed");
        return Ok(());
    }

    if reports.iter().any(|r| r.interrupted) {
        bail!("interrupted");
    }

    let failed: usize = reports.iter().map(|r| r.failures.len()).sum();
    bail!("{} could not be processed", plural_count(failed, "file"))
}

/// Make sure the tools a stage needs are installed.
fn preflight(config: &PipelineConfig, stage: Stage) -> Result<()> {
    let command = match stage {
        Stage::Reconcile => return Ok(()),
        Stage::Flatten => &config.flatten.command,
        Stage::RemoveBackground => &config.background.command,
        Stage::Encode => match encode::external_command(config) {
            Some(command) => command,
            None => return Ok(()),
        },
    };
    command
        .ensure_installed()
        .with_context(|| format!("cannot run stage `{stage}`"))
}

/// Walk `root` and return matching files in a stable order.
fn collect_files(root: &Path, extensions: &[String], exclude: &PathSet) -> Result<Vec<PathBuf>> {
    let mut files = walk_files(root, extensions, exclude)?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to scan `{}`", root.display()))?;
    files.sort();
    Ok(files)
}

/// Feed each file to `handle`, recording failures instead of stopping.
fn process_files<F>(
    config: &PipelineConfig,
    stage: Stage,
    files: Vec<PathBuf>,
    opts: &RunOptions,
    mut handle: F,
) -> Result<StageReport>
where
    F: FnMut(&Path) -> Result<Outcome>,
{
    let mut report = StageReport::new(stage);
    debug!(stage.name(); "{} candidate files", files.len());

    let progress = Progress::new(stage.name(), files.len());
    for (index, path) in files.iter().enumerate() {
        if (opts.interrupted)() {
            log!(stage.name(); "interrupted, {} files left", files.len() - index);
            report.interrupted = true;
            break;
        }

        match handle(path) {
            Ok(Outcome::Done) => report.processed += 1,
            Ok(Outcome::Skipped) => report.skipped += 1,
            Err(err) if opts.fail_fast => {
                return Err(err.context(format!(
                    "{stage}: failed on `{}`",
                    config.root_relative(path).display()
                )));
            }
            Err(err) => {
                report.failures.push(FileFailure {
                    path: path.clone(),
                    message: format!("{err:#}"),
                });
            }
        }
        progress.inc();
    }
    progress.finish();

    Ok(report)
}

/// Best-effort removal of a half-written file after a failed step.
fn discard_partial(path: &Path) {
    if path.exists()
        && let Err(err) = fs::remove_file(path)
    {
        log!("warning"; "could not remove partial file `{}`: {}", path.display(), err);
    }
}
