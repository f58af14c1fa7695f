//! Gantry CLI library.
//!
//! This library provides the core functionality for the Gantry
//! command-line interface: argument parsing, image loading, output
//! formatting, and result persistence.

pub mod cli;
pub mod error;
pub mod imaging;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, Result};
pub use output::Formatter;
