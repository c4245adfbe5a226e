//! Command-line interface.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, DetectArgs, OutputFormat};
pub use commands::dispatch;
