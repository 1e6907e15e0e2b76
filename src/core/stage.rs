//! Pipeline stage identifiers.

use std::fmt;

/// One of the four batch stages, in pipeline order.
///
/// ```text
/// Reconcile → Flatten → RemoveBackground → Encode
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Align the output tree with the source tree.
    Reconcile,
    /// Layered source files to flat raster files.
    Flatten,
    /// Strip backgrounds from raster files in place.
    RemoveBackground,
    /// Raster files to WebP, originals removed.
    Encode,
}

impl Stage {
    /// Short name used as log prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reconcile => "reconcile",
            Self::Flatten => "flatten",
            Self::RemoveBackground => "nobg",
            Self::Encode => "encode",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
