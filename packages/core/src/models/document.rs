//! Persisted curriculum document shapes
//!
//! Two shapes exist on disk:
//!
//! - **Current**: `{ "roots": [id], "nodes": { id: NodeRecord } }`, which
//!   deserializes straight into [`Forest`].
//! - **Legacy**: `{ "value": [NestedNodeRecord] }`, where `subsections` embeds
//!   full child records. Read-only; migrated to the current shape on load.
//!
//! [`StoredDocument::from_value`] inspects the JSON shape before choosing a
//! decoder, so the legacy importer never runs on data that is already flat.

use crate::error::{CurriculumError, Result};
use crate::models::ResourceLink;
use crate::tree::Forest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node in the legacy format, children embedded in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedNodeRecord {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub subsections: Vec<NestedNodeRecord>,

    #[serde(default)]
    pub links: Vec<ResourceLink>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Legacy document wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyDocument {
    pub value: Vec<NestedNodeRecord>,
}

/// A curriculum document in whichever shape it was persisted
#[derive(Debug, Clone, PartialEq)]
pub enum StoredDocument {
    Current(Forest),
    Legacy(LegacyDocument),
}

impl StoredDocument {
    /// Decode a persisted document, choosing the decoder by shape
    ///
    /// A document with `roots` and `nodes` is current. A document with a
    /// `value` array is legacy, unless its records already carry id strings in
    /// `subsections`, which means it was flattened before and is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| CurriculumError::legacy_format("document must be a JSON object"))?;

        if object.contains_key("roots") && object.contains_key("nodes") {
            return Ok(Self::Current(serde_json::from_value(value)?));
        }

        match object.get("value") {
            Some(Value::Array(records)) => {
                if records.iter().any(has_flat_subsections) {
                    return Err(CurriculumError::legacy_format(
                        "legacy records already hold subsection ids",
                    ));
                }
                Ok(Self::Legacy(serde_json::from_value(value)?))
            }
            Some(_) => Err(CurriculumError::legacy_format("'value' must be an array")),
            None => Err(CurriculumError::legacy_format(
                "expected either 'roots' and 'nodes' or a legacy 'value' array",
            )),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

/// True if any record in this nested subtree lists a child as a bare id
fn has_flat_subsections(record: &Value) -> bool {
    match record.get("subsections") {
        Some(Value::Array(children)) => children.iter().any(|child| match child {
            Value::String(_) => true,
            Value::Object(_) => has_flat_subsections(child),
            _ => false,
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_shape_is_detected() {
        let doc = StoredDocument::from_value(json!({
            "roots": ["s1"],
            "nodes": {"s1": {"id": "s1", "title": "Intro", "subsections": []}}
        }))
        .unwrap();

        assert!(!doc.is_legacy());
        match doc {
            StoredDocument::Current(forest) => assert_eq!(forest.roots, vec!["s1"]),
            StoredDocument::Legacy(_) => panic!("Expected current document"),
        }
    }

    #[test]
    fn test_legacy_shape_is_detected() {
        let doc = StoredDocument::from_value(json!({
            "value": [{
                "id": "s1",
                "title": "Intro",
                "subsections": [{"id": "s1a", "title": "Part A"}]
            }]
        }))
        .unwrap();

        match doc {
            StoredDocument::Legacy(legacy) => {
                assert_eq!(legacy.value.len(), 1);
                assert_eq!(legacy.value[0].subsections[0].id, "s1a");
            }
            StoredDocument::Current(_) => panic!("Expected legacy document"),
        }
    }

    #[test]
    fn test_flattened_legacy_is_rejected() {
        let err = StoredDocument::from_value(json!({
            "value": [{"id": "s1", "subsections": ["s1a"]}]
        }))
        .unwrap_err();
        assert!(matches!(err, CurriculumError::LegacyFormat { .. }));
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        assert!(StoredDocument::from_value(json!({"outline": []})).is_err());
        assert!(StoredDocument::from_value(json!([1, 2, 3])).is_err());
        assert!(StoredDocument::from_value(json!({"value": "nope"})).is_err());
    }
}
