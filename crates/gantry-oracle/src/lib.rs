//! Gantry Oracle Provider Layer
//!
//! Pluggable OCR-oracle implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `Oracle` trait from
//! `gantry-domain`. The oracle is the external multimodal model treated
//! as a black-box image-to-text capability; everything in this crate is
//! transport plumbing around it.
//!
//! # Providers
//!
//! - `ScriptedOracle`: Deterministic scripted replies for testing
//! - `OpenRouterOracle`: OpenRouter chat-completions API integration
//!
//! # Examples
//!
//! ```
//! use gantry_oracle::ScriptedOracle;
//! use gantry_domain::{ConversationTurn, Oracle};
//!
//! let oracle = ScriptedOracle::new(["[]"]);
//! let turns = [ConversationTurn::user("extract the containers")];
//! assert_eq!(oracle.call(&turns).unwrap(), "[]");
//! ```

#![warn(missing_docs)]

pub mod openrouter;

use gantry_domain::{ConversationTurn, Oracle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openrouter::OpenRouterOracle;

/// Errors that can occur during oracle calls
#[derive(Error, Debug)]
pub enum OracleError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider returned a response the client could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available on the provider
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Oracle error: {0}")]
    Other(String),
}

/// One scripted reply for the [`ScriptedOracle`].
#[derive(Debug, Clone)]
enum ScriptedReply {
    Text(String),
    Failure(String),
}

/// Scripted oracle for deterministic testing
///
/// Plays a queue of pre-configured replies in order, one per call,
/// without any network traffic. Every request's turns are recorded so
/// tests can assert what the correction loop actually sent — for
/// example, that a correction request names only the invalid
/// identifiers.
///
/// # Examples
///
/// ```
/// use gantry_oracle::ScriptedOracle;
/// use gantry_domain::{ConversationTurn, Oracle};
///
/// let oracle = ScriptedOracle::new(["first reply", "second reply"]);
/// let turns = [ConversationTurn::user("hello")];
///
/// assert_eq!(oracle.call(&turns).unwrap(), "first reply");
/// assert_eq!(oracle.call(&turns).unwrap(), "second reply");
/// assert_eq!(oracle.call_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedOracle {
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<Vec<ConversationTurn>>>>,
}

impl ScriptedOracle {
    /// Create a scripted oracle that plays the given replies in order.
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = replies
            .into_iter()
            .map(|r| ScriptedReply::Text(r.into()))
            .collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a reply to the end of the script.
    pub fn push_response(&self, reply: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Text(reply.into()));
    }

    /// Append a transport failure to the end of the script.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Failure(message.into()));
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The turns sent on the `index`-th call (0-based).
    pub fn request(&self, index: usize) -> Option<Vec<ConversationTurn>> {
        self.requests.lock().unwrap().get(index).cloned()
    }

    /// The turns sent on the most recent call.
    pub fn last_request(&self) -> Option<Vec<ConversationTurn>> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Oracle for ScriptedOracle {
    type Error = OracleError;

    fn call(&self, turns: &[ConversationTurn]) -> Result<String, Self::Error> {
        self.requests.lock().unwrap().push(turns.to_vec());

        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedReply::Text(reply)) => Ok(reply),
            Some(ScriptedReply::Failure(message)) => Err(OracleError::Other(message)),
            None => Err(OracleError::Other("script exhausted".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turns() -> Vec<ConversationTurn> {
        vec![ConversationTurn::user("test prompt")]
    }

    #[test]
    fn test_scripted_oracle_plays_in_order() {
        let oracle = ScriptedOracle::new(["one", "two"]);

        assert_eq!(oracle.call(&turns()).unwrap(), "one");
        assert_eq!(oracle.call(&turns()).unwrap(), "two");
    }

    #[test]
    fn test_scripted_oracle_exhausted_script_fails() {
        let oracle = ScriptedOracle::new(["only"]);
        oracle.call(&turns()).unwrap();

        let result = oracle.call(&turns());
        assert!(matches!(result, Err(OracleError::Other(_))));
    }

    #[test]
    fn test_scripted_oracle_failure_injection() {
        let oracle = ScriptedOracle::new(["fine"]);
        oracle.push_failure("connection reset");

        assert!(oracle.call(&turns()).is_ok());
        let result = oracle.call(&turns());
        assert!(matches!(result, Err(OracleError::Other(_))));
    }

    #[test]
    fn test_scripted_oracle_records_requests() {
        let oracle = ScriptedOracle::new(["a", "b"]);

        oracle.call(&[ConversationTurn::user("first")]).unwrap();
        oracle
            .call(&[
                ConversationTurn::user("first"),
                ConversationTurn::assistant("a"),
                ConversationTurn::user("second"),
            ])
            .unwrap();

        assert_eq!(oracle.call_count(), 2);
        assert_eq!(oracle.request(0).unwrap().len(), 1);
        let last = oracle.last_request().unwrap();
        assert_eq!(last.len(), 3);
        assert_eq!(last[2].text(), "second");
    }

    #[test]
    fn test_scripted_oracle_clone_shares_state() {
        let oracle1 = ScriptedOracle::new(["shared"]);
        let oracle2 = oracle1.clone();

        oracle1.call(&turns()).unwrap();

        // Both handles see the same script and call record
        assert_eq!(oracle1.call_count(), 1);
        assert_eq!(oracle2.call_count(), 1);
    }
}
