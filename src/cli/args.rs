//! Command-line interface definitions.

use clap::{ColorChoice, Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::core::Stage;

/// Default config file name, searched upward from the current directory.
pub const DEFAULT_CONFIG: &str = "imgpipe.toml";

/// Layered source images to background-free WebP
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Stages to run, in order
    #[arg(value_enum, value_name = "STAGE")]
    pub commands: Vec<Command>,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: imgpipe.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Source directory of layered images (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Output directory for generated images (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Stop a stage at the first file that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Config file name or path to look for.
    pub fn config_name(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CONFIG))
    }
}

/// Pipeline commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Create the output tree and clear regenerated folders
    #[value(name = "check_remove")]
    CheckRemove,

    /// Flatten layered sources into the output tree
    #[value(name = "save_images")]
    SaveImages,

    /// Re-encode output rasters to WebP
    #[value(name = "convert")]
    Convert,

    /// Remove backgrounds, then re-encode to WebP
    #[value(name = "remove_backgrounds")]
    RemoveBackgrounds,

    /// Run every stage
    #[value(name = "all")]
    All,
}

impl Command {
    /// Stages this command runs, in order.
    pub const fn stages(self) -> &'static [Stage] {
        match self {
            Self::CheckRemove => &[Stage::Reconcile],
            Self::SaveImages => &[Stage::Flatten],
            Self::Convert => &[Stage::Encode],
            Self::RemoveBackgrounds => &[Stage::RemoveBackground, Stage::Encode],
            Self::All => &[
                Stage::Reconcile,
                Stage::Flatten,
                Stage::RemoveBackground,
                Stage::Encode,
            ],
        }
    }
}
