//! Layered source -> raster conversion.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::{Outcome, discard_partial};
use crate::config::PipelineConfig;
use crate::tool::file_vars;
use crate::utils::path::rebase;
use crate::debug;

/// Where `source_file` lands in the output tree.
///
/// `raw_images/weapons/Sword.xcf` -> `images/weapons/Sword.png`
pub fn output_path(config: &PipelineConfig, source_file: &Path) -> Result<PathBuf> {
    let target = rebase(source_file, &config.paths.source, &config.paths.output)?;
    Ok(target.with_extension(config.flatten.format.trim_start_matches('.')))
}

/// Flatten one layered file, overwriting any earlier output.
pub fn flatten_file(config: &PipelineConfig, source_file: &Path) -> Result<Outcome> {
    let output = output_path(config, source_file)?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    // a stale file would hide a converter that exits 0 without writing
    if output.exists() {
        fs::remove_file(&output)
            .with_context(|| format!("failed to replace `{}`", output.display()))?;
    }

    debug!(
        "flatten";
        "{} -> {}",
        config.root_relative(source_file).display(),
        config.root_relative(&output).display()
    );

    let result = config
        .flatten
        .command
        .invoke(&file_vars(source_file, &output))
        .and_then(|out| out.check());
    if let Err(err) = result {
        discard_partial(&output);
        return Err(err.into());
    }

    if !output.is_file() {
        bail!("converter did not write `{}`", output.display());
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use tempfile::TempDir;

    #[test]
    fn test_output_path_mirrors_and_swaps_extension() {
        let config = test_config(Path::new("/site"), "");
        let out = output_path(&config, Path::new("/site/raw/weapons/melee/Saber.xcf")).unwrap();
        assert_eq!(out, PathBuf::from("/site/out/weapons/melee/Saber.png"));
    }

    #[test]
    fn test_output_path_outside_source() {
        let config = test_config(Path::new("/site"), "");
        assert!(output_path(&config, Path::new("/elsewhere/Saber.xcf")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_flatten_creates_parent_dirs_and_keeps_source() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("raw/weapons/melee")).unwrap();
        let source = root.join("raw/weapons/melee/Saber.xcf");
        fs::write(&source, "layers").unwrap();

        let config = test_config(root, "[flatten]\ncommand = [\"cp\", \"$INPUT\", \"$OUTPUT\"]");
        assert_eq!(flatten_file(&config, &source).unwrap(), Outcome::Done);

        assert_eq!(fs::read(root.join("out/weapons/melee/Saber.png")).unwrap(), b"layers");
        assert_eq!(fs::read(&source).unwrap(), b"layers");
    }

    #[cfg(unix)]
    #[test]
    fn test_flatten_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("raw")).unwrap();
        fs::create_dir_all(root.join("out")).unwrap();
        fs::write(root.join("raw/Sword.xcf"), "new").unwrap();
        fs::write(root.join("out/Sword.png"), "old").unwrap();

        let config = test_config(root, "[flatten]\ncommand = [\"cp\", \"$INPUT\", \"$OUTPUT\"]");
        flatten_file(&config, &root.join("raw/Sword.xcf")).unwrap();

        assert_eq!(fs::read(root.join("out/Sword.png")).unwrap(), b"new");
    }

    #[cfg(unix)]
    #[test]
    fn test_flatten_tool_failure() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("raw")).unwrap();
        fs::write(root.join("raw/Sword.xcf"), "layers").unwrap();

        let config = test_config(
            root,
            "[flatten]\ncommand = [\"sh\", \"-c\", \"printf half > \\\"$1\\\"; exit 1\", \"sh\", \"$OUTPUT\"]",
        );
        let err = flatten_file(&config, &root.join("raw/Sword.xcf")).unwrap_err();

        assert!(err.to_string().contains("exited with code 1"));
        assert!(!root.join("out/Sword.png").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_flatten_tool_without_output() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("raw")).unwrap();
        fs::write(root.join("raw/Sword.xcf"), "layers").unwrap();

        let config = test_config(root, "[flatten]\ncommand = [\"true\"]");
        let err = flatten_file(&config, &root.join("raw/Sword.xcf")).unwrap_err();
        assert!(err.to_string().contains("did not write"));
    }
}
