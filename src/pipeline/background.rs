//! In-place background removal.
//!
//! The remover is spawned once per file and always writes to a temporary
//! sibling. The original is only replaced once the tool has exited with
//! status 0 and the temporary file exists:
//!
//! ```text
//! Axe.png ──rembg──▶ Axe_rembg.png ──rename──▶ Axe.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::{Outcome, discard_partial};
use crate::config::PipelineConfig;
use crate::tool::file_vars;
use crate::utils::path::with_stem_suffix;
use crate::{debug, log};

/// Drop temp files left behind by an interrupted run.
///
/// A temp file is only stale when its original still sits next to it.
/// Everything else is returned unchanged.
pub fn prune_stale_temps(config: &PipelineConfig, files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let suffix = &config.background.suffix;
    let (stale, files): (Vec<_>, Vec<_>) = files.iter().cloned().partition(|path| {
        files
            .iter()
            .any(|original| original != path && with_stem_suffix(original, suffix) == *path)
    });

    for path in stale {
        log!("nobg"; "removing stale {}", config.root_relative(&path).display());
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove `{}`", path.display()))?;
    }
    Ok(files)
}

/// Strip the background of one file, unless it is listed in
/// `exclude.skip_background`.
pub fn remove_background(config: &PipelineConfig, path: &Path) -> Result<Outcome> {
    if config.exclude.skip_background.contains(path) {
        debug!("nobg"; "skipping {}", config.root_relative(path).display());
        return Ok(Outcome::Skipped);
    }

    let temp = with_stem_suffix(path, &config.background.suffix);
    if temp.exists() {
        fs::remove_file(&temp)
            .with_context(|| format!("failed to remove stale `{}`", temp.display()))?;
    }

    debug!("nobg"; "{}", config.root_relative(path).display());

    let result = config
        .background
        .command
        .invoke(&file_vars(path, &temp))
        .and_then(|out| out.check());
    if let Err(err) = result {
        discard_partial(&temp);
        return Err(err.into());
    }

    if !temp.is_file() {
        bail!("background remover did not write `{}`", temp.display());
    }

    // rename replaces the original atomically on the same filesystem
    fs::rename(&temp, path).with_context(|| {
        format!(
            "failed to move `{}` over `{}`",
            temp.display(),
            path.display()
        )
    })?;

    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::scan::PathSet;
    use tempfile::TempDir;

    fn config_with(root: &Path, command: &str) -> PipelineConfig {
        test_config(root, &format!("[background]\ncommand = {command}"))
    }

    #[cfg(unix)]
    #[test]
    fn test_replaces_original_with_tool_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Axe.png");
        fs::write(&path, "with-background").unwrap();

        let config = config_with(
            dir.path(),
            r#"["sh", "-c", "printf stripped > \"$1\"", "sh", "$OUTPUT"]"#,
        );
        assert_eq!(remove_background(&config, &path).unwrap(), Outcome::Done);

        assert_eq!(fs::read(&path).unwrap(), b"stripped");
        assert!(!dir.path().join("Axe_rembg.png").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_tool_keeps_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Axe.png");
        fs::write(&path, "original").unwrap();

        let config = config_with(
            dir.path(),
            r#"["sh", "-c", "printf partial > \"$1\"; exit 2", "sh", "$OUTPUT"]"#,
        );
        let err = remove_background(&config, &path).unwrap_err();

        assert!(err.to_string().contains("code 2"));
        assert_eq!(fs::read(&path).unwrap(), b"original");
        assert!(!dir.path().join("Axe_rembg.png").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_temp_keeps_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Axe.png");
        fs::write(&path, "original").unwrap();

        let config = config_with(dir.path(), r#"["true"]"#);
        let err = remove_background(&config, &path).unwrap_err();

        assert!(err.to_string().contains("did not write"));
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_temp_not_mistaken_for_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Axe.png");
        fs::write(&path, "original").unwrap();
        fs::write(dir.path().join("Axe_rembg.png"), "stale").unwrap();

        let config = config_with(dir.path(), r#"["true"]"#);
        assert!(remove_background(&config, &path).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn test_skip_set_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Blade.png");
        fs::write(&path, "manual").unwrap();

        let mut config = config_with(dir.path(), r#"["imgpipe-no-such-tool-8f3a"]"#);
        config.exclude.skip_background = PathSet::new([path.clone()]);

        assert_eq!(remove_background(&config, &path).unwrap(), Outcome::Skipped);
        assert_eq!(fs::read(&path).unwrap(), b"manual");
    }

    #[test]
    fn test_prune_stale_temps() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for name in ["Axe.png", "Axe_rembg.png", "Lonely_rembg.png"] {
            fs::write(root.join(name), "").unwrap();
        }

        let config = test_config(root, "");
        let files = vec![
            root.join("Axe.png"),
            root.join("Axe_rembg.png"),
            root.join("Lonely_rembg.png"),
        ];
        let kept = prune_stale_temps(&config, files).unwrap();

        assert_eq!(kept, vec![root.join("Axe.png"), root.join("Lonely_rembg.png")]);
        assert!(!root.join("Axe_rembg.png").exists());
        assert!(root.join("Lonely_rembg.png").exists());
    }
}
