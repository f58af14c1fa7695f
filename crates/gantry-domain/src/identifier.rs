//! Container identifier normalization and check-digit validation
//!
//! Implements the standard check-digit scheme for container codes:
//! 4 owner letters + 6 serial digits + 1 check digit. The letter value
//! table and the positional weighting are fixed by the standard; any
//! deviation silently breaks interoperability with printed container
//! markings, so this module is covered by exhaustive unit tests.

use thiserror::Error;

/// Total length of a full container identifier.
pub const ID_LENGTH: usize = 11;

/// Length of the identifier body the check digit is computed over.
pub const BODY_LENGTH: usize = 10;

/// Errors for identifier bodies that cannot be fed to the check-digit
/// computation. Always local to a single record, never session-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Body is not exactly 10 characters after normalization
    #[error("identifier body must be exactly {BODY_LENGTH} characters after normalization, got {0}")]
    Length(usize),

    /// Character has no value in the check-digit scheme
    #[error("invalid character {0:?} in identifier body")]
    Character(char),
}

/// Per-record validation outcome for a full 11-character identifier.
///
/// Derived, never stored: identifiers change between correction rounds,
/// so outcomes are recomputed from scratch every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Identifier matches the required shape and its check digit
    Valid,
    /// Identifier is not 4 letters followed by 7 digits
    InvalidFormat,
    /// Shape is right but the claimed check digit disagrees with the
    /// computed one
    ChecksumMismatch,
}

impl ValidationOutcome {
    /// True for `Valid`.
    pub fn is_valid(self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }
}

/// Normalize a raw identifier string: uppercase, ASCII letters and
/// digits only.
///
/// Total and idempotent; malformed input yields a string that simply
/// fails later validation.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Value of a single body character under the check-digit scheme.
///
/// Digits map to themselves. Letters map through the fixed table that
/// assigns consecutive values from 10 but skips every multiple of 11,
/// so A=10, B=12, ..., K=21, L=23, ..., U=32, V=34, ..., Z=38.
fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'A' => Some(10),
        'B' => Some(12),
        'C' => Some(13),
        'D' => Some(14),
        'E' => Some(15),
        'F' => Some(16),
        'G' => Some(17),
        'H' => Some(18),
        'I' => Some(19),
        'J' => Some(20),
        'K' => Some(21),
        'L' => Some(23),
        'M' => Some(24),
        'N' => Some(25),
        'O' => Some(26),
        'P' => Some(27),
        'Q' => Some(28),
        'R' => Some(29),
        'S' => Some(30),
        'T' => Some(31),
        'U' => Some(32),
        'V' => Some(34),
        'W' => Some(35),
        'X' => Some(36),
        'Y' => Some(37),
        'Z' => Some(38),
        _ => None,
    }
}

/// Compute the check digit for a 10-character identifier body.
///
/// The body is normalized first; it must come out at exactly 10
/// characters. Each character's value is weighted by `2^i` for its
/// 0-indexed position, the products are summed, and the check digit is
/// the sum modulo 11 — with a remainder of exactly 10 mapping to 0.
///
/// # Errors
/// Returns [`FormatError`] if the normalized body is not 10 characters
/// or contains a character with no value in the scheme.
pub fn check_digit(body: &str) -> Result<u32, FormatError> {
    let cleaned = normalize(body);
    if cleaned.len() != BODY_LENGTH {
        return Err(FormatError::Length(cleaned.len()));
    }

    let mut sum: u64 = 0;
    for (i, c) in cleaned.chars().enumerate() {
        let value = char_value(c).ok_or(FormatError::Character(c))?;
        sum += u64::from(value) << i;
    }

    let remainder = (sum % 11) as u32;
    Ok(if remainder == 10 { 0 } else { remainder })
}

/// Validate a full container identifier against the check-digit standard.
///
/// Normalizes, requires exactly 11 characters shaped as 4 letters then
/// 7 digits, then compares the trailing digit against the check digit
/// computed from the first 10 characters.
pub fn validate(raw: &str) -> ValidationOutcome {
    let id = normalize(raw);
    if !matches_pattern(&id) {
        return ValidationOutcome::InvalidFormat;
    }

    // Pattern match guarantees an ASCII digit in the last position and
    // a well-formed 10-character body before it.
    let claimed = id.as_bytes()[ID_LENGTH - 1] - b'0';
    match check_digit(&id[..BODY_LENGTH]) {
        Ok(expected) if expected == u32::from(claimed) => ValidationOutcome::Valid,
        Ok(_) => ValidationOutcome::ChecksumMismatch,
        Err(_) => ValidationOutcome::InvalidFormat,
    }
}

/// 4 uppercase ASCII letters followed by 7 ASCII digits.
fn matches_pattern(id: &str) -> bool {
    id.len() == ID_LENGTH
        && id.bytes().take(4).all(|b| b.is_ascii_uppercase())
        && id.bytes().skip(4).all(|b| b.is_ascii_digit())
}
