//! imgpipe - layered source images to background-free WebP.

mod cli;
mod config;
mod core;
mod logger;
mod pipeline;
mod scan;
mod tool;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, CommandFactory, Parser};
use cli::Cli;
use config::PipelineConfig;
use pipeline::{RunOptions, finish, run_stages};
use utils::plural::plural_count;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if cli.commands.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let config = PipelineConfig::load(&cli)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }
    debug!(
        "config";
        "{} ignored, {} cleared, {} kept with background",
        plural_count(config.exclude.ignore.len(), "folder"),
        plural_count(config.exclude.clear.len(), "folder"),
        plural_count(config.exclude.skip_background.len(), "file")
    );

    let opts = RunOptions {
        fail_fast: cli.fail_fast,
        ..Default::default()
    };

    let stages = cli.commands.iter().flat_map(|command| command.stages().iter().copied());
    let reports = run_stages(&config, stages, &opts)?;
    finish(&reports)
}
