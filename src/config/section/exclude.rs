//! `[exclude]` section configuration.
//!
//! Three independent path lists, all matched exactly (no globs):
//!
//! ```toml
//! [exclude]
//! # Hand-made folders: never walked, converted or deleted
//! ignore = ["raw_images/icons", "images/icons"]
//! # Derived output folders: deleted on every reconcile
//! clear = ["images/weapons"]
//! # Output files whose background is already removed by hand
//! skip_background = ["images/weapons/CavalrySaber.png"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scan::PathSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// Manually maintained folders, in both trees.
    pub ignore: PathSet,

    /// Output folders removed and regenerated by reconcile.
    pub clear: PathSet,

    /// Output files the background remover must not touch.
    pub skip_background: PathSet,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            ignore: PathSet::new([
                "raw_images/icons",
                "raw_images/bullets",
                "raw_images/status_icons",
                "images/icons",
                "images/bullets",
                "images/status_icons",
            ]),
            clear: PathSet::new(["images/weapons", "images/consumables", "images/tools"]),
            skip_background: PathSet::new([
                "images/weapons/CavalrySaber.png",
                "images/weapons/Martini-HenryIC1Riposte.png",
                "images/weapons/BerthierMle1892Riposte.png",
                "images/weapons/Romero77Alamo.png",
            ]),
        }
    }
}

impl ExcludeConfig {
    pub(crate) fn normalize(&mut self, root: &Path) {
        self.ignore = self.ignore.resolve_against(root);
        self.clear = self.clear.resolve_against(root);
        self.skip_background = self.skip_background.resolve_against(root);
    }
}
