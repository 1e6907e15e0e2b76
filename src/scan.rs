//! Directory walking (pure, no side effects).
//!
//! [`walk_files`] lists files below a root whose extension is in a requested
//! set, never descending into excluded directories:
//!
//! ```text
//! raw_images/
//! ├── weapons/
//! │   └── Sword.xcf        -> yielded
//! ├── icons/               -> excluded, not read at all
//! │   └── Icon.xcf
//! └── notes.txt            -> wrong extension, skipped
//! ```

use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::path::resolve_path;

/// Errors raised while walking a tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory `{0}` does not exist")]
    NotFound(PathBuf),

    #[error("`{0}` is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to read directory entry")]
    Walk(#[from] jwalk::Error),
}

// ============================================================================
// PathSet
// ============================================================================

/// A set of paths compared by exact (component-wise) equality.
///
/// Used for every exclusion list: ignored folders, cleared folders and files
/// that skip background removal. No glob or prefix matching is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSet(Vec<PathBuf>);

impl PathSet {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.iter().any(|p| p == path)
    }

    /// Resolve every entry against `base` (see [`resolve_path`]).
    pub fn resolve_against(&self, base: &Path) -> Self {
        Self(self.0.iter().map(|p| resolve_path(p, base)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ============================================================================
// Walk
// ============================================================================

/// Lazily list files under `root` with one of `extensions`.
///
/// Directories contained in `exclude` are pruned before their children are
/// read. Extensions are compared ASCII case-insensitively and may be given
/// with or without a leading dot. Entry order is unspecified.
///
/// Fails up front if `root` is missing or not a directory; errors met while
/// walking are yielded as items.
pub fn walk_files(
    root: &Path,
    extensions: &[String],
    exclude: &PathSet,
) -> Result<impl Iterator<Item = Result<PathBuf, ScanError>> + use<>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let extensions: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .collect();
    let excluded = exclude.clone();

    let walker = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .process_read_dir(move |_depth, _dir, _state, children| {
            children.retain(|entry| match entry {
                Ok(entry) => !(entry.file_type().is_dir() && excluded.contains(&entry.path())),
                Err(_) => true,
            });
        });

    Ok(walker.into_iter().filter_map(move |entry| match entry {
        Ok(entry) => {
            let path = entry.path();
            let file_type = entry.file_type();
            let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
            (is_file && has_extension(&path, &extensions)).then_some(Ok(path))
        }
        Err(err) => Some(Err(ScanError::Walk(err))),
    }))
}

/// Check a path's extension against lowercase, dot-less `extensions`.
fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
