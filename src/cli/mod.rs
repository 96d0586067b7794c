//! Command-line interface components

pub mod args;
pub mod commands;

pub use args::{Args, FormatArg};
pub use commands::Command;
