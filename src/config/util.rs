//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`.
///
/// # Example
/// ```text
/// /home/user/game/raw_images/weapons/  ← cwd
/// /home/user/game/imgpipe.toml         ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, config_name)
}

/// Walk up from `start` looking for `config_name`.
fn find_upward(start: &Path, config_name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_upward_from_nested_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("raw_images/weapons");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("imgpipe.toml"), "").unwrap();

        let found = find_upward(&nested, Path::new("imgpipe.toml"));
        assert_eq!(found, Some(dir.path().join("imgpipe.toml")));
    }

    #[test]
    fn test_find_upward_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("imgpipe.toml")).unwrap();
        let found = find_upward(dir.path(), Path::new("imgpipe.toml"));
        // a directory with the config name is not a config file
        assert_ne!(found, Some(dir.path().join("imgpipe.toml")));
    }

    #[test]
    fn test_find_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert_eq!(find_config_file(&path), None);
        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path));
    }
}
