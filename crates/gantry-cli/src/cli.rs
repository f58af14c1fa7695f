//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

/// Extract container IDs and markings from a photograph using an OCR
/// oracle, validating every identifier against the check-digit standard.
#[derive(Debug, Parser)]
#[command(name = "gantry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the container image file
    pub image: PathBuf,

    /// Output JSON file path
    #[arg(short, long, default_value = "container_data.json")]
    pub output: PathBuf,

    /// Model to use for extraction
    #[arg(long, default_value = gantry_oracle::openrouter::DEFAULT_MODEL)]
    pub model: String,

    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum number of correction iterations
    #[arg(long, default_value_t = 3)]
    pub max_iterations: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliFormat::Table)]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (container IDs only)
    Quiet,
}
