//! Configuration section definitions.
//!
//! Each module corresponds to a section in `imgpipe.toml`:
//!
//! | Module       | TOML Section   | Purpose                              |
//! |--------------|----------------|--------------------------------------|
//! | `paths`      | `[paths]`      | Source and output roots              |
//! | `exclude`    | `[exclude]`    | Ignored, cleared and skipped paths   |
//! | `flatten`    | `[flatten]`    | Layered -> raster converter          |
//! | `background` | `[background]` | Background removal tool              |
//! | `encode`     | `[encode]`     | Raster -> WebP encoder               |

mod background;
mod encode;
mod exclude;
mod flatten;
mod paths;

pub use background::BackgroundConfig;
pub use encode::{EncodeBackend, EncodeConfig};
pub use exclude::ExcludeConfig;
pub use flatten::FlattenConfig;
pub use paths::PathsConfig;
