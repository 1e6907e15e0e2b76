//! `[encode]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [encode]
//! backend = "external"    # external | builtin
//! quality = 80            # Lossy quality for the external encoder (0-100)
//! command = ["cwebp", "-quiet", "-q", "$QUALITY", "$INPUT", "-o", "$OUTPUT"]
//! ```
//!
//! # Behavior
//!
//! - `backend = "external"` -> run `command` once per file (lossy by default)
//! - `backend = "builtin"`  -> encode lossless WebP in-process, `command` and
//!   `quality` are ignored

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::tool::ToolCommand;

/// WebP encoding backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EncodeBackend {
    /// Run the configured external encoder.
    #[default]
    External,
    /// Lossless WebP through the `image` crate.
    Builtin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    pub backend: EncodeBackend,

    /// Substituted for `$QUALITY`.
    pub quality: u8,

    pub command: ToolCommand,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            backend: EncodeBackend::External,
            quality: 80,
            command: ToolCommand::new([
                "cwebp", "-quiet", "-q", "$QUALITY", "$INPUT", "-o", "$OUTPUT",
            ]),
        }
    }
}

impl EncodeConfig {
    pub const QUALITY: FieldPath = FieldPath::new("encode.quality");
    pub const COMMAND: FieldPath = FieldPath::new("encode.command");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.quality > 100 {
            diag.error(Self::QUALITY, "quality must be between 0 and 100");
        }
        if self.backend == EncodeBackend::External && self.command.is_empty() {
            diag.error_with_hint(
                Self::COMMAND,
                "encoder command is empty",
                "set a command or use backend = \"builtin\"",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_encode_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.encode.backend, EncodeBackend::External);
        assert_eq!(config.encode.quality, 80);
        assert_eq!(config.encode.command.program(), "cwebp");
    }

    #[test]
    fn test_encode_builtin() {
        let config = test_parse_config("[encode]\nbackend = \"builtin\"");
        assert_eq!(config.encode.backend, EncodeBackend::Builtin);
    }

    #[test]
    fn test_encode_invalid_quality() {
        let config = test_parse_config("[encode]\nquality = 150");
        let mut diag = ConfigDiagnostics::new();
        config.encode.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
    }

    #[test]
    fn test_builtin_ignores_empty_command() {
        let config = test_parse_config("[encode]\nbackend = \"builtin\"\ncommand = []");
        let mut diag = ConfigDiagnostics::new();
        config.encode.validate(&mut diag);
        assert!(diag.errors().is_empty());
    }
}
