//! Gantry Extractor
//!
//! Drives an OCR oracle through a bounded extract-validate-correct loop
//! until every container identifier in the response passes check-digit
//! validation, or the iteration budget runs out.
//!
//! # Overview
//!
//! One session covers one photograph. The session sends the image and
//! an extraction prompt to the oracle, parses the reply into an ordered
//! record set, validates every identifier against the check-digit
//! standard, and — when identifiers fail — asks the oracle to correct
//! exactly those identifiers while leaving everything else untouched.
//! The conversation log gives the oracle memory of its own prior
//! answers across rounds.
//!
//! # Architecture
//!
//! ```text
//! Image → ExtractionSession → Oracle → ExtractionSet → validation
//!              ↑                                            │
//!              └──────────── correction request ←───────────┘
//! ```
//!
//! # Key Properties
//!
//! - **Bounded**: at most `max_iterations` rounds, guaranteed to
//!   terminate
//! - **Scoped corrections**: only invalid identifiers are named, so the
//!   oracle does not perturb entries that already validate
//! - **Soft exhaustion**: running out of rounds returns the
//!   best-available set with failures flagged, not an error
//! - **Terminal transport errors**: an oracle failure ends the session
//!   immediately; no correction attempt is "owed"
//!
//! # Example Usage
//!
//! ```
//! use gantry_extractor::{ExtractionSession, SessionConfig};
//! use gantry_oracle::ScriptedOracle;
//! use gantry_domain::ImageData;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let oracle = ScriptedOracle::new([r#"[{"container_id": "CSQU3054383"}]"#]);
//! let session = ExtractionSession::new(oracle, SessionConfig::default());
//!
//! let image = ImageData::new("image/jpeg", "...base64...");
//! let report = session.run(image).await?;
//!
//! println!("Extracted {} containers", report.records.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod parser;
mod prompt;
mod session;
mod types;

#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use error::ExtractorError;
pub use parser::parse_extraction;
pub use session::{classify, ExtractionSession};
pub use types::{SessionMetadata, SessionOutcome, SessionReport, ValidationFailure};
