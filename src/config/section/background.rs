//! `[background]` section configuration.
//!
//! ```toml
//! [background]
//! command = ["rembg", "i", "$INPUT", "$OUTPUT"]
//! suffix = "_rembg"       # Temp sibling: Axe.png -> Axe_rembg.png
//! ```
//!
//! The remover is started once per file, never in batch mode, so a leaking
//! tool only lives as long as one image.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::tool::ToolCommand;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub command: ToolCommand,

    /// Appended to the file stem to name the temporary output.
    pub suffix: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            command: ToolCommand::new(["rembg", "i", "$INPUT", "$OUTPUT"]),
            suffix: "_rembg".to_string(),
        }
    }
}

impl BackgroundConfig {
    pub const COMMAND: FieldPath = FieldPath::new("background.command");
    pub const SUFFIX: FieldPath = FieldPath::new("background.suffix");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.command.is_empty() {
            diag.error(Self::COMMAND, "background removal command is empty");
        }
        if self.suffix.is_empty() {
            diag.error(Self::SUFFIX, "suffix must not be empty");
        } else if self.suffix.contains(['/', '\\']) {
            diag.error(Self::SUFFIX, "suffix must not contain path separators");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_background_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.background.command.program(), "rembg");
        assert_eq!(config.background.suffix, "_rembg");
    }

    #[test]
    fn test_background_validate_suffix() {
        let mut diag = ConfigDiagnostics::new();
        BackgroundConfig {
            suffix: String::new(),
            ..Default::default()
        }
        .validate(&mut diag);
        BackgroundConfig {
            suffix: "/tmp".into(),
            ..Default::default()
        }
        .validate(&mut diag);
        assert_eq!(diag.errors().len(), 2);
    }
}
