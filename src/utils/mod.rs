//! Utility modules shared by the pipeline and the CLI.

pub mod date;
pub mod hash;
pub mod path;
mod plural;

pub use plural::plural_count;
