//! Core types shared across the pipeline.

mod stage;
mod state;

pub use stage::Stage;
pub use state::{is_shutdown, setup_shutdown_handler};
