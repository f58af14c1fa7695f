//! Container record model
//!
//! Wire-facing: field names and shapes match the JSON the oracle is
//! asked to produce, so an oracle response deserializes straight into
//! [`ExtractionSet`]. Every field defaults, partial output still parses.

use crate::identifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel identifier the oracle emits when it cannot read a code.
///
/// Matched case-insensitively; exempt from validation. An unresolved
/// record still counts toward the detected-container total.
pub const UNKNOWN_ID: &str = "Unknown";

fn default_container_id() -> String {
    UNKNOWN_ID.to_string()
}

/// One detected container and its markings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// Container identifier as read off the container, or the
    /// `"Unknown"` sentinel
    #[serde(default = "default_container_id")]
    pub container_id: String,

    /// Carrier name as painted on the container (e.g. "CROWLEY")
    #[serde(default)]
    pub carrier: String,

    /// Container type code (e.g. "LPG1"); free-form, not validated
    #[serde(rename = "type", default)]
    pub container_type: String,

    /// Marked external dimensions
    #[serde(default)]
    pub dimensions: Dimensions,

    /// Additional markings, keyed by a small controlled vocabulary:
    /// location, code, identifier, additional_mark, additional_info_N
    #[serde(default)]
    pub marked_details: BTreeMap<String, String>,

    /// Weight and capacity markings keyed by category
    /// (gross weight, tare, net, cubic capacity)
    #[serde(default)]
    pub weight_capacity: BTreeMap<String, WeightSpec>,
}

impl Default for ContainerRecord {
    fn default() -> Self {
        Self {
            container_id: default_container_id(),
            carrier: String::new(),
            container_type: String::new(),
            dimensions: Dimensions::default(),
            marked_details: BTreeMap::new(),
            weight_capacity: BTreeMap::new(),
        }
    }
}

impl ContainerRecord {
    /// Create a record carrying only an identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            container_id: id.into(),
            ..Self::default()
        }
    }

    /// True when the identifier is the `"Unknown"` sentinel — an
    /// admitted read failure, not a wrong guess.
    pub fn is_unresolved(&self) -> bool {
        self.container_id.eq_ignore_ascii_case(UNKNOWN_ID)
    }

    /// Rewrite the identifier in place to its normalized form.
    ///
    /// The sentinel is canonicalized to the spelling `"Unknown"` rather
    /// than normalized; stripping it to `UNKNOWN` would make it fail
    /// format validation and lose its exemption.
    pub fn normalize_identifier(&mut self) {
        if self.is_unresolved() {
            self.container_id = UNKNOWN_ID.to_string();
        } else {
            self.container_id = identifier::normalize(&self.container_id);
        }
    }
}

/// Marked external dimensions of a container. Free-form strings,
/// recorded as painted (e.g. "40'", "9'6\"").
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    /// Marked length
    #[serde(default)]
    pub length: String,

    /// Marked height
    #[serde(default)]
    pub height: String,
}

/// One weight or capacity marking in both unit systems.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeightSpec {
    /// Kilograms, or cubic meters for capacity entries
    #[serde(rename = "kgs/cum", default)]
    pub kgs_cum: String,

    /// Pounds, or cubic feet for capacity entries
    #[serde(rename = "lbs/cuft", default)]
    pub lbs_cuft: String,
}

/// Ordered sequence of detected containers.
///
/// Order mirrors the source image (left to right, top to bottom) and is
/// preserved across correction rounds. A set is parsed fresh from each
/// oracle response; the previous round's set is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionSet(Vec<ContainerRecord>);

impl ExtractionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of detected containers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no containers were detected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a record, keeping insertion order.
    pub fn push(&mut self, record: ContainerRecord) {
        self.0.push(record);
    }

    /// Records in image order.
    pub fn records(&self) -> &[ContainerRecord] {
        &self.0
    }

    /// Iterate records in image order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContainerRecord> {
        self.0.iter()
    }

    /// Iterate records mutably, preserving order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ContainerRecord> {
        self.0.iter_mut()
    }

    /// Consume the set, yielding the ordered records.
    pub fn into_records(self) -> Vec<ContainerRecord> {
        self.0
    }
}

impl From<Vec<ContainerRecord>> for ExtractionSet {
    fn from(records: Vec<ContainerRecord>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a ExtractionSet {
    type Item = &'a ContainerRecord;
    type IntoIter = std::slice::Iter<'a, ContainerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_from_full_wire_shape() {
        let json = r#"{
            "container_id": "CMCU 455 7748",
            "carrier": "CROWLEY",
            "type": "LPG1",
            "dimensions": {"length": "40'", "height": "9'6\""},
            "marked_details": {"location": "door", "code": "22G1"},
            "weight_capacity": {
                "gross weight": {"kgs/cum": "30480", "lbs/cuft": "67200"},
                "tare": {"kgs/cum": "3980", "lbs/cuft": "8770"}
            }
        }"#;

        let record: ContainerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.container_id, "CMCU 455 7748");
        assert_eq!(record.carrier, "CROWLEY");
        assert_eq!(record.container_type, "LPG1");
        assert_eq!(record.dimensions.length, "40'");
        assert_eq!(record.marked_details["location"], "door");
        assert_eq!(record.weight_capacity["tare"].kgs_cum, "3980");
    }

    #[test]
    fn test_record_deserializes_from_partial_wire_shape() {
        let record: ContainerRecord = serde_json::from_str(r#"{"carrier": "MAERSK"}"#).unwrap();
        assert_eq!(record.container_id, "Unknown");
        assert!(record.is_unresolved());
        assert_eq!(record.carrier, "MAERSK");
    }

    #[test]
    fn test_unresolved_is_case_insensitive() {
        assert!(ContainerRecord::with_id("Unknown").is_unresolved());
        assert!(ContainerRecord::with_id("UNKNOWN").is_unresolved());
        assert!(ContainerRecord::with_id("unknown").is_unresolved());
        assert!(!ContainerRecord::with_id("CSQU3054383").is_unresolved());
    }

    #[test]
    fn test_normalize_identifier_in_place() {
        let mut record = ContainerRecord::with_id("cmcu 455 7748");
        record.normalize_identifier();
        assert_eq!(record.container_id, "CMCU4557748");
    }

    #[test]
    fn test_normalize_identifier_preserves_sentinel() {
        let mut record = ContainerRecord::with_id("UNKNOWN");
        record.normalize_identifier();
        assert_eq!(record.container_id, "Unknown");
        assert!(record.is_unresolved());
    }

    #[test]
    fn test_extraction_set_preserves_order() {
        let json = r#"[
            {"container_id": "CSQU3054383"},
            {"container_id": "Unknown"},
            {"container_id": "MSKU1234565"}
        ]"#;

        let set: ExtractionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 3);
        let ids: Vec<&str> = set.iter().map(|r| r.container_id.as_str()).collect();
        assert_eq!(ids, ["CSQU3054383", "Unknown", "MSKU1234565"]);
    }

    #[test]
    fn test_extraction_set_serializes_transparently() {
        let mut set = ExtractionSet::new();
        set.push(ContainerRecord::with_id("CSQU3054383"));
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("CSQU3054383"));
    }
}
