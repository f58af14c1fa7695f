//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Extraction session error
    #[error("Extraction error: {0}")]
    Extraction(#[from] gantry_extractor::ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unreadable or unsupported image file
    #[error("Invalid image file: {0}")]
    InvalidImage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No API key supplied
    #[error("OpenRouter API key required. Set OPENROUTER_API_KEY or use --api-key.")]
    MissingApiKey,
}
