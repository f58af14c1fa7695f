//! Parse oracle output into an extraction set

use crate::error::ExtractorError;
use gantry_domain::ExtractionSet;

/// Parse an oracle response into an ordered extraction set.
///
/// The response must be a JSON array of container records, optionally
/// wrapped in a markdown code fence. Anything else is a
/// [`ExtractorError::ResponseParse`], which the session treats as a
/// retryable round.
pub fn parse_extraction(response: &str) -> Result<ExtractionSet, ExtractorError> {
    // Oracles sometimes wrap JSON in markdown code blocks
    let json_str = strip_code_fence(response);

    let set: ExtractionSet = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::ResponseParse(format!("JSON parse error: {}", e)))?;

    Ok(set)
}

/// Strip a surrounding markdown code fence, if present.
///
/// Idempotent: already-bare text passes through unchanged, and a
/// stripped result strips to itself.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return trimmed,
    };

    body.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}
