//! `[flatten]` section configuration.
//!
//! Layered source files are flattened to raster files by an external
//! converter (ImageMagick by default).
//!
//! ```toml
//! [flatten]
//! extensions = ["xcf"]    # Layered source extensions
//! format = "png"          # Raster extension written into the output tree
//! command = ["magick", "$INPUT", "-background", "none", "-flatten", "$OUTPUT"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::tool::ToolCommand;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    pub extensions: Vec<String>,

    /// Raster format, also the extension every later stage looks for.
    pub format: String,

    pub command: ToolCommand,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["xcf".to_string()],
            format: "png".to_string(),
            command: ToolCommand::new([
                "magick",
                "$INPUT",
                "-background",
                "none",
                "-flatten",
                "$OUTPUT",
            ]),
        }
    }
}

impl FlattenConfig {
    pub const EXTENSIONS: FieldPath = FieldPath::new("flatten.extensions");
    pub const FORMAT: FieldPath = FieldPath::new("flatten.format");
    pub const COMMAND: FieldPath = FieldPath::new("flatten.command");

    /// Raster extension as a one-element list for the walker.
    pub fn raster_extensions(&self) -> Vec<String> {
        vec![self.format.trim_start_matches('.').to_string()]
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extensions.iter().all(|ext| ext.trim().is_empty()) {
            diag.error(Self::EXTENSIONS, "at least one source extension is required");
        }
        let format = self.format.trim_start_matches('.').trim();
        if format.is_empty() {
            diag.error(Self::FORMAT, "raster format must not be empty");
        } else if format.eq_ignore_ascii_case("webp") {
            diag.error_with_hint(
                Self::FORMAT,
                "raster format must differ from the encoded format",
                "the encode stage turns every raster file into `.webp`, use e.g. \"png\"",
            );
        }
        if self.command.is_empty() {
            diag.error_with_hint(
                Self::COMMAND,
                "converter command is empty",
                "e.g. command = [\"magick\", \"$INPUT\", \"-flatten\", \"$OUTPUT\"]",
            );
        }
    }
}
