//! Command-line interface for pdfseal
//!
//! clap parses the arguments; each command lives in its own module under
//! [`commands`] and reports through the shared [`Output`] styling.

pub mod args;
pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
