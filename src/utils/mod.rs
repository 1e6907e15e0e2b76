//! Utility modules for the image pipeline.

pub mod exec;
pub mod path;
pub mod plural;
