//! `[paths]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! source = "raw_images"   # Layered source files (never modified)
//! output = "images"       # Derived raster/WebP files
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::resolve_path;

/// Source and output roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of layered source images.
    pub source: PathBuf,

    /// Directory of generated images, mirroring `source`.
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("raw_images"),
            output: PathBuf::from("images"),
        }
    }
}

impl PathsConfig {
    pub const OUTPUT: FieldPath = FieldPath::new("paths.output");

    pub(crate) fn normalize(&mut self, root: &Path) {
        self.source = resolve_path(&self.source, root);
        self.output = resolve_path(&self.output, root);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.source == self.output {
            diag.error_with_hint(
                Self::OUTPUT,
                "output directory is the same as the source directory",
                "generated files must not be written into the source tree",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_paths_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.paths.source, PathBuf::from("raw_images"));
        assert_eq!(config.paths.output, PathBuf::from("images"));
    }

    #[test]
    fn test_paths_override() {
        let config = test_parse_config("[paths]\nsource = \"art/xcf\"\noutput = \"public/img\"");
        assert_eq!(config.paths.source, PathBuf::from("art/xcf"));
        assert_eq!(config.paths.output, PathBuf::from("public/img"));
    }

    #[test]
    fn test_paths_normalize() {
        let mut paths = PathsConfig::default();
        paths.normalize(Path::new("/site"));
        assert_eq!(paths.source, PathBuf::from("/site/raw_images"));
        assert_eq!(paths.output, PathBuf::from("/site/images"));
    }

    #[test]
    fn test_same_source_and_output_rejected() {
        let paths = PathsConfig {
            source: PathBuf::from("/site/images"),
            output: PathBuf::from("/site/images"),
        };
        let mut diag = ConfigDiagnostics::new();
        paths.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
    }
}
