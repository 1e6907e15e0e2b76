//! Filesystem path helpers.
//!
//! - `clean_path` - lexical cleanup (drops `.` components)
//! - `resolve_path` - tilde expansion + join with a base directory
//! - `rebase` - move a path from one root to another
//! - `with_stem_suffix` - sibling path with a suffix appended to the stem

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

/// Drop `.` components without touching the filesystem.
///
/// Unlike `canonicalize()` this works for paths that do not exist yet, which
/// keeps configured paths comparable with paths produced by a directory walk
/// over the same root.
#[inline]
pub fn clean_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Resolve a configured path against `base`.
///
/// `~` is expanded first. Absolute paths are kept as-is.
///
/// # Example
/// ```ignore
/// resolve_path(Path::new("./raw_images"), Path::new("/site")) // -> /site/raw_images
/// resolve_path(Path::new("~/art"), Path::new("/site"))       // -> /home/me/art
/// ```
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        clean_path(&path)
    } else {
        clean_path(&base.join(path))
    }
}

/// Re-root `path` from `from` onto `to`.
///
/// `raw/weapons/Sword.xcf` rebased from `raw` onto `out` is `out/weapons/Sword.xcf`.
pub fn rebase(path: &Path, from: &Path, to: &Path) -> Result<PathBuf> {
    let rel = path
        .strip_prefix(from)
        .with_context(|| format!("`{}` is not inside `{}`", path.display(), from.display()))?;
    Ok(to.join(rel))
}

/// Sibling path with `suffix` appended to the file stem.
///
/// `out/Axe.png` with suffix `_rembg` is `out/Axe_rembg.png`.
pub fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path_drops_cur_dir() {
        assert_eq!(
            clean_path(Path::new("/site/./images/./weapons")),
            PathBuf::from("/site/images/weapons")
        );
        assert_eq!(clean_path(Path::new("./images")), PathBuf::from("images"));
    }

    #[test]
    fn test_resolve_path_relative() {
        let resolved = resolve_path(Path::new("./raw_images/icons"), Path::new("/site"));
        assert_eq!(resolved, PathBuf::from("/site/raw_images/icons"));
    }

    #[test]
    fn test_resolve_path_absolute() {
        let resolved = resolve_path(Path::new("/art/raw"), Path::new("/site"));
        assert_eq!(resolved, PathBuf::from("/art/raw"));
    }

    #[test]
    fn test_rebase() {
        let rebased = rebase(
            Path::new("/site/raw/weapons/Sword.xcf"),
            Path::new("/site/raw"),
            Path::new("/site/out"),
        )
        .unwrap();
        assert_eq!(rebased, PathBuf::from("/site/out/weapons/Sword.xcf"));
    }

    #[test]
    fn test_rebase_outside_root() {
        assert!(rebase(Path::new("/elsewhere/a.xcf"), Path::new("/site/raw"), Path::new("/out")).is_err());
    }

    #[test]
    fn test_with_stem_suffix() {
        assert_eq!(
            with_stem_suffix(Path::new("out/weapons/Axe.png"), "_rembg"),
            PathBuf::from("out/weapons/Axe_rembg.png")
        );
        // Only the last extension is split off
        assert_eq!(
            with_stem_suffix(Path::new("out/Martini-Henry.IC1.png"), "_rembg"),
            PathBuf::from("out/Martini-Henry.IC1_rembg.png")
        );
        assert_eq!(
            with_stem_suffix(Path::new("out/README"), "_x"),
            PathBuf::from("out/README_x")
        );
    }
}
