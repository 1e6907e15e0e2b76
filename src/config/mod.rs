//! Pipeline configuration management for `imgpipe.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── paths      # [paths]
//! │   ├── exclude    # [exclude]
//! │   ├── flatten    # [flatten]
//! │   ├── background # [background]
//! │   └── encode     # [encode]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! The config file is optional. Without one, every section keeps its
//! defaults and relative paths resolve against the current directory.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BackgroundConfig, EncodeBackend, EncodeConfig, ExcludeConfig, FlattenConfig, PathsConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, log, utils::path::resolve_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing imgpipe.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Absolute path to the config file, `None` when running on defaults
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root: parent of the config file, else the current directory
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub paths: PathsConfig,

    /// Exclusion sets (ignored, cleared, background-skipped)
    #[serde(default)]
    pub exclude: ExcludeConfig,

    #[serde(default)]
    pub flatten: FlattenConfig,

    #[serde(default)]
    pub background: BackgroundConfig,

    #[serde(default)]
    pub encode: EncodeConfig,
}

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing file is only
    /// an error when `--config` was given explicitly.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match find_config_file(cli.config_name()) {
            Some(path) => Some(resolve_path(&path, &cwd)),
            None if cli.config.is_some() => {
                return Err(ConfigError::NotFound(cli.config_name().to_path_buf()).into());
            }
            None => None,
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        config.config_path = config_path;
        config.finalize(&root);

        // CLI overrides are typed relative to where the user stands
        if let Some(source) = &cli.source {
            config.paths.source = resolve_path(source, &cwd);
        }
        if let Some(output) = &cli.output {
            config.paths.output = resolve_path(output, &cwd);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("in `{}`", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }

    /// Set the root and resolve every configured path against it.
    pub fn finalize(&mut self, root: &Path) {
        self.root = crate::utils::path::clean_path(root);
        let root = self.root.clone();
        self.paths.normalize(&root);
        self.exclude.normalize(&root);
    }

    /// Validate the whole configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.paths.validate(&mut diag);
        self.flatten.validate(&mut diag);
        self.background.validate(&mut diag);
        self.encode.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config rooted at `root` with `raw/` and `out/` as source and output, no
/// exclusions, and the given tool commands.
#[cfg(test)]
pub fn test_config(root: &Path, extra: &str) -> PipelineConfig {
    let content = format!(
        "[paths]\nsource = \"raw\"\noutput = \"out\"\n\
         [exclude]\nignore = []\nclear = []\nskip_background = []\n{extra}"
    );
    let mut config = test_parse_config(&content);
    config.finalize(root);
    config
}

// ============================================================================
// tests
// ============================================================================
