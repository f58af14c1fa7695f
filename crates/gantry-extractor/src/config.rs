//! Configuration for extraction sessions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one extraction session.
///
/// Supplied once at session construction and never mutated mid-session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum extraction/correction rounds before the session settles
    /// for its best-available result (also bounds consecutive parse
    /// retries)
    pub max_iterations: u32,

    /// Maximum time for a single oracle call (seconds)
    pub oracle_timeout_secs: u64,
}

impl SessionConfig {
    /// Get the oracle timeout as a Duration
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be greater than 0".to_string());
        }
        if self.oracle_timeout_secs == 0 {
            return Err("oracle_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for SessionConfig {
    /// Default configuration: three rounds, generous vision-call timeout
    fn default() -> Self {
        Self {
            max_iterations: 3,
            oracle_timeout_secs: 300,
        }
    }
}
