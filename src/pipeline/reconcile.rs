//! Output tree reconciliation.
//!
//! - Output root missing: create it.
//! - Output root present: delete every `exclude.clear` directory.
//! - Then create a missing output directory for each top-level directory of
//!   the source root. Deeper levels are left to the stages that write files.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::log;

/// Directories touched by one reconcile run.
#[derive(Debug, Default)]
pub struct ReconcileSummary {
    pub removed: Vec<PathBuf>,
    pub created: Vec<PathBuf>,
}

pub fn reconcile(config: &PipelineConfig) -> Result<ReconcileSummary> {
    let source = &config.paths.source;
    let output = &config.paths.output;
    let mut summary = ReconcileSummary::default();

    if !output.exists() {
        log!("reconcile"; "creating {}", config.root_relative(output).display());
        fs::create_dir(output)
            .with_context(|| format!("failed to create `{}`", output.display()))?;
        summary.created.push(output.clone());
    } else {
        for dir in config.exclude.clear.iter().filter(|dir| dir.is_dir()) {
            log!("reconcile"; "removing {}", config.root_relative(dir).display());
            fs::remove_dir_all(dir)
                .with_context(|| format!("failed to remove `{}`", dir.display()))?;
            summary.removed.push(dir.to_path_buf());
        }
    }

    let entries = fs::read_dir(source)
        .with_context(|| format!("failed to read source directory `{}`", source.display()))?;

    let mut mirrors = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read `{}`", source.display()))?;
        if entry.path().is_dir() {
            mirrors.push(output.join(entry.file_name()));
        }
    }
    mirrors.sort();

    for target in mirrors.into_iter().filter(|target| !target.exists()) {
        log!("reconcile"; "creating {}", config.root_relative(&target).display());
        fs::create_dir(&target)
            .with_context(|| format!("failed to create `{}`", target.display()))?;
        summary.created.push(target);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::scan::PathSet;
    use std::path::Path;
    use tempfile::TempDir;

    fn setup(root: &Path, dirs: &[&str]) {
        for dir in dirs {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
    }

    #[test]
    fn test_creates_missing_output_root_and_mirrors() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        setup(root, &["raw/weapons/melee", "raw/tools"]);
        fs::write(root.join("raw/readme.txt"), "").unwrap();

        let summary = reconcile(&test_config(root, "")).unwrap();

        assert!(root.join("out/weapons").is_dir());
        assert!(root.join("out/tools").is_dir());
        // only one level is mirrored
        assert!(!root.join("out/weapons/melee").exists());
        assert!(!root.join("out/readme.txt").exists());
        assert_eq!(summary.created.len(), 3);
        assert!(summary.removed.is_empty());
    }

    #[test]
    fn test_clears_listed_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        setup(root, &["raw/weapons", "out/weapons/old", "out/icons"]);
        fs::write(root.join("out/weapons/old/Sword.webp"), "stale").unwrap();
        fs::write(root.join("out/icons/Icon.svg"), "manual").unwrap();

        let mut config = test_config(root, "");
        config.exclude.clear = PathSet::new([root.join("out/weapons"), root.join("out/tools")]);

        let summary = reconcile(&config).unwrap();

        assert_eq!(summary.removed, vec![root.join("out/weapons")]);
        // recreated empty as a mirror of raw/weapons
        assert!(root.join("out/weapons").is_dir());
        assert!(!root.join("out/weapons/old").exists());
        // not listed, kept
        assert_eq!(fs::read(root.join("out/icons/Icon.svg")).unwrap(), b"manual");
    }

    #[test]
    fn test_cleared_dir_without_source_stays_gone() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        setup(root, &["raw", "out/consumables"]);

        let mut config = test_config(root, "");
        config.exclude.clear = PathSet::new([root.join("out/consumables")]);
        reconcile(&config).unwrap();

        assert!(!root.join("out/consumables").exists());
    }

    #[test]
    fn test_fresh_output_is_not_cleared() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        setup(root, &["raw/weapons"]);

        let mut config = test_config(root, "");
        config.exclude.clear = PathSet::new([root.join("out/weapons")]);
        let summary = reconcile(&config).unwrap();

        assert!(summary.removed.is_empty());
        assert!(root.join("out/weapons").is_dir());
    }

    #[test]
    fn test_existing_mirrors_untouched() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        setup(root, &["raw/tools", "out/tools"]);
        fs::write(root.join("out/tools/Shovel.webp"), "kept").unwrap();

        let summary = reconcile(&test_config(root, "")).unwrap();

        assert!(summary.created.is_empty());
        assert_eq!(fs::read(root.join("out/tools/Shovel.webp")).unwrap(), b"kept");
    }

    #[test]
    fn test_missing_source_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(reconcile(&test_config(dir.path(), "")).is_err());
    }
}
