//! Command-line interface for hrenamer

pub mod commands;
pub mod output;

pub use commands::{Cli, RunStatus};
pub use output::Output;
