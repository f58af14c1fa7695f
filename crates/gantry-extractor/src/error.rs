//! Error types for the extraction session

use thiserror::Error;

/// Session-level failures.
///
/// Per-record validation findings (`InvalidFormat`, `ChecksumMismatch`)
/// are outcomes, not errors — they drive the correction loop and never
/// abort a session. Only transport failures and total parse exhaustion
/// are fatal.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Oracle transport or provider failure; terminal for the session,
    /// with no automatic retry inside the loop
    #[error("Oracle call failed: {0}")]
    Oracle(String),

    /// Oracle call exceeded the configured timeout; terminal
    #[error("Oracle call timed out")]
    Timeout,

    /// Oracle response was not a well-formed record array; recoverable
    /// by retrying the round, up to the iteration budget
    #[error("Response parse failed: {0}")]
    ResponseParse(String),

    /// Session exhausted its budget without ever obtaining a
    /// well-formed response
    #[error("No parseable response after {attempts} attempts")]
    Convergence {
        /// Consecutive parse failures at the point of giving up
        attempts: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
