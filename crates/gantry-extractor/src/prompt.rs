//! Oracle prompt construction
//!
//! Two request shapes: the initial extraction request describing the
//! target JSON shape, and the correction request that names only the
//! currently-invalid identifiers so the oracle does not perturb entries
//! that already validate.

/// JSON shape the oracle is asked to fill in, one object per container.
const RESPONSE_SHAPE: &str = r#"[
  {
    "container_id": "4 letters + 7 digits, or Unknown if unreadable",
    "carrier": "carrier name as painted",
    "type": "container type code",
    "dimensions": {
      "length": "marked length",
      "height": "marked height"
    },
    "marked_details": {
      "location": "...",
      "code": "...",
      "identifier": "...",
      "additional_mark": "..."
    },
    "weight_capacity": {
      "gross weight": {"kgs/cum": "...", "lbs/cuft": "..."},
      "tare": {"kgs/cum": "...", "lbs/cuft": "..."},
      "net": {"kgs/cum": "...", "lbs/cuft": "..."},
      "cubic capacity": {"kgs/cum": "...", "lbs/cuft": "..."}
    }
  }
]"#;

/// Build the initial extraction request.
pub fn extraction_prompt() -> String {
    format!(
        r#"Extract all the text from each container in the image.

Output the information on each container as a structured JSON object according to the shape below.

```json
{RESPONSE_SHAPE}
```

Focus on:
1. Container IDs (e.g., CMCU 455 7748)
2. Carrier names (e.g., CROWLEY)
3. Container types (e.g., LPG1)
4. Dimensions (length and height)
5. Weight specifications (M.G.W, TARE, NET)
6. Cubic capacity (CUB.CAP)
7. Any additional markings

The JSON array must be in the same order as the containers in the image - left to right, top to bottom.

Return only the JSON array, no additional text or formatting."#
    )
}

/// Build a correction request for the given invalid identifiers.
///
/// Scoped to only the invalid subset: the oracle is told to keep every
/// already-correct entry untouched and to preserve the original count
/// and order.
pub fn correction_prompt(invalid_ids: &[String], original_count: usize) -> String {
    format!(
        r#"IMPORTANT: Only correct the INVALID container IDs listed below. Do NOT change any container IDs that are already correct.

The following {count} container IDs are INVALID and need correction:
{ids}

Requirements for correction:
1. Look at the image again and ONLY fix the invalid container IDs listed above
2. Keep ALL other valid container IDs exactly as they were in your previous response
3. Maintain the exact same number of containers ({original_count}) and the same order
4. Only change the invalid container IDs to match what you actually see in the image
5. Use proper container ID format: 4 letters + 7 digits with valid check digit

Container ID format rules:
- 4 letters (owner code) + 7 digits
- The last digit is a check digit calculated from the first 10 characters
- Example: ABCD1234560 (where the final 0 is the check digit)

Return only the corrected JSON array with all containers, maintaining the same order as before."#,
        count = invalid_ids.len(),
        ids = invalid_ids.join(", "),
    )
}
