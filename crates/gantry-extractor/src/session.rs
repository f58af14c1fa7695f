//! Extraction session: the bounded extract-validate-correct loop

use crate::config::SessionConfig;
use crate::error::ExtractorError;
use crate::parser::parse_extraction;
use crate::prompt;
use crate::types::{SessionMetadata, SessionOutcome, SessionReport, ValidationFailure};
use gantry_domain::{
    identifier, ConversationLog, ConversationTurn, ExtractionSet, ImageData, Oracle,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// One extraction session over one photograph.
///
/// The session owns its conversation log and iteration counters; `run`
/// consumes the session, so a log can never be shared across sessions.
/// Execution is strictly sequential: each round blocks on the oracle
/// call, and no two rounds overlap.
pub struct ExtractionSession<O>
where
    O: Oracle,
{
    oracle: Arc<O>,
    config: SessionConfig,
    log: ConversationLog,
    model_name: String,
}

impl<O> ExtractionSession<O>
where
    O: Oracle + Send + Sync + 'static,
    O::Error: std::fmt::Display,
{
    /// Create a new session.
    pub fn new(oracle: O, config: SessionConfig) -> Self {
        Self {
            oracle: Arc::new(oracle),
            config,
            log: ConversationLog::new(),
            model_name: "oracle".to_string(),
        }
    }

    /// Create a new session with a specific model name for reporting.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Run the extraction-correction loop over one image.
    ///
    /// Returns a [`SessionReport`] on both convergence and budget
    /// exhaustion; the only errors are terminal ones (transport
    /// failure, timeout, or a response that never parses).
    pub async fn run(mut self, image: ImageData) -> Result<SessionReport, ExtractorError> {
        self.config
            .validate()
            .map_err(ExtractorError::Config)?;

        let start_time = SystemTime::now();

        info!(
            model = %self.model_name,
            max_iterations = self.config.max_iterations,
            "Starting extraction session"
        );

        self.log
            .push(ConversationTurn::user_with_image(
                prompt::extraction_prompt(),
                image,
            ));

        let mut rounds: u32 = 0;
        let mut parse_failures: u32 = 0;
        let mut parse_retries_total: u32 = 0;
        let mut original_count: Option<usize> = None;
        let mut warnings: Vec<String> = Vec::new();

        loop {
            // Any transport failure is terminal for the session; a
            // failed call does not grant an extra correction attempt.
            let raw = self.call_oracle().await?;
            debug!("Oracle response length: {} chars", raw.len());

            self.log.push(ConversationTurn::assistant(raw.clone()));

            let mut set = match parse_extraction(&raw) {
                Ok(set) => {
                    parse_failures = 0;
                    set
                }
                Err(e) => {
                    parse_failures += 1;
                    parse_retries_total += 1;
                    if parse_failures >= self.config.max_iterations {
                        warn!(
                            attempts = parse_failures,
                            "Giving up: no parseable response"
                        );
                        return Err(ExtractorError::Convergence {
                            attempts: parse_failures,
                        });
                    }
                    // Retry the round; parse retries never consume a
                    // correction slot. The malformed reply stays in the
                    // append-only log.
                    warn!(attempt = parse_failures, "Response did not parse: {}", e);
                    continue;
                }
            };

            rounds += 1;

            let current_count = set.len();
            let floor = *original_count.get_or_insert(current_count);
            info!(round = rounds, containers = current_count, "Parsed response");

            for record in set.iter_mut() {
                record.normalize_identifier();
            }

            let invalid = classify(&set);

            for failure in &invalid {
                warn!(
                    round = rounds,
                    index = failure.index,
                    identifier = %failure.identifier,
                    "Invalid container ID: {:?}",
                    failure.outcome
                );
            }

            if rounds > 1 && current_count < floor {
                let message = format!(
                    "container count decreased from {} to {}",
                    floor, current_count
                );
                warn!(round = rounds, "{}", message);
                warnings.push(message);
            }

            if invalid.is_empty() {
                // A count regression warns but does not block
                // convergence; only invalid identifiers force another
                // round.
                if rounds > 1 {
                    info!(rounds, "Converged after correction");
                } else {
                    info!("Converged on first extraction");
                }
                return Ok(SessionReport {
                    records: set,
                    outcome: SessionOutcome::Converged { rounds },
                    unresolved: Vec::new(),
                    warnings,
                    metadata: self.metadata(rounds, parse_retries_total, start_time),
                });
            }

            if rounds >= self.config.max_iterations {
                warn!(
                    rounds,
                    unresolved = invalid.len(),
                    "Iteration budget exhausted; returning best-available set"
                );
                return Ok(SessionReport {
                    records: set,
                    outcome: SessionOutcome::Exhausted,
                    unresolved: invalid,
                    warnings,
                    metadata: self.metadata(rounds, parse_retries_total, start_time),
                });
            }

            let invalid_ids: Vec<String> = invalid
                .iter()
                .map(|failure| failure.identifier.clone())
                .collect();
            info!(
                round = rounds,
                invalid = invalid_ids.len(),
                "Requesting corrections"
            );
            self.log.push(ConversationTurn::user(prompt::correction_prompt(
                &invalid_ids,
                floor,
            )));
        }
    }

    /// Call the oracle with the full conversation so far.
    async fn call_oracle(&self) -> Result<String, ExtractorError> {
        let oracle = Arc::clone(&self.oracle);
        let turns: Vec<ConversationTurn> = self.log.turns().to_vec();

        // Call in a blocking context since Oracle is not async
        let call = tokio::task::spawn_blocking(move || {
            oracle
                .call(&turns)
                .map_err(|e| ExtractorError::Oracle(e.to_string()))
        });

        timeout(self.config.oracle_timeout(), call)
            .await
            .map_err(|_| ExtractorError::Timeout)?
            .map_err(|e| ExtractorError::Oracle(format!("Task join error: {}", e)))?
    }

    fn metadata(
        &self,
        rounds: u32,
        parse_retries: u32,
        start_time: SystemTime,
    ) -> SessionMetadata {
        SessionMetadata {
            model_name: self.model_name.clone(),
            rounds,
            parse_retries,
            processing_time_ms: start_time
                .elapsed()
                .unwrap_or(Duration::from_secs(0))
                .as_millis() as u64,
        }
    }
}

/// Classify every record in a set, returning the invalid subset.
///
/// The sentinel `"Unknown"` is an admitted read failure, not a wrong
/// guess; it is never flagged. Outcomes are computed fresh on every
/// call since identifiers change between rounds.
pub fn classify(set: &ExtractionSet) -> Vec<ValidationFailure> {
    set.iter()
        .enumerate()
        .filter(|(_, record)| !record.is_unresolved())
        .filter_map(
            |(index, record)| match identifier::validate(&record.container_id) {
                outcome if outcome.is_valid() => None,
                outcome => Some(ValidationFailure {
                    index,
                    identifier: record.container_id.clone(),
                    outcome,
                }),
            },
        )
        .collect()
}
