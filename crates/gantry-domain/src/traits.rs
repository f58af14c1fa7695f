//! Trait definitions for external interactions
//!
//! These traits define the boundary between domain logic and
//! infrastructure. Provider implementations live in other crates.

use crate::conversation::ConversationTurn;

/// The OCR oracle: a pure request/response capability mapping a
/// role-tagged conversation to raw text, with no state of its own.
///
/// Implemented by the infrastructure layer (gantry-oracle). Any
/// transport or provider failure surfaces through `Error` and is
/// terminal for the calling session.
pub trait Oracle {
    /// Error type for transport and provider failures
    type Error;

    /// Send the conversation so far and return the oracle's raw reply.
    fn call(&self, turns: &[ConversationTurn]) -> Result<String, Self::Error>;
}
