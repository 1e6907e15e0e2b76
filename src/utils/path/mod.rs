//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path helpers (`clean_path`, `resolve_path`, `rebase`, `with_stem_suffix`)

pub mod fs;

pub use fs::{clean_path, rebase, resolve_path, with_stem_suffix};
